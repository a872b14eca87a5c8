//! Per-render traversal state.

use std::collections::HashSet;

use jsonld_hydra_resource::{ObjectRef, object_id};

/// Identities of the objects on the current render path.
///
/// A fresh context is created for every top-level render call, so a renderer
/// shared between threads never sees another call's visits.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use jsonld_hydra_renderer::TraversalContext;
/// use jsonld_hydra_resource::{DomainObject, ObjectRef, Record};
///
/// struct Node;
///
/// impl DomainObject for Node {
/// 	fn type_name(&self) -> &str {
/// 		"graph::Node"
/// 	}
///
/// 	fn fields(&self) -> Record {
/// 		Record::new()
/// 	}
/// }
///
/// let node: ObjectRef = Arc::new(Node);
/// let mut context = TraversalContext::new();
///
/// assert!(context.visit(&node));
/// assert!(!context.visit(&node));
///
/// context.leave(&node);
/// assert!(context.visit(&node));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TraversalContext {
	visited: HashSet<usize>,
}

impl TraversalContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// Mark `object` as being rendered.
	///
	/// Returns `false` when it is already on the path, which means the graph
	/// loops back to it.
	pub fn visit(&mut self, object: &ObjectRef) -> bool {
		self.visited.insert(object_id(object))
	}

	/// Unmark `object` once its subtree is rendered, so siblings may share it.
	pub fn leave(&mut self, object: &ObjectRef) {
		self.visited.remove(&object_id(object));
	}

	pub fn is_visited(&self, object: &ObjectRef) -> bool {
		self.visited.contains(&object_id(object))
	}

	/// Forget every visit.
	pub fn clear(&mut self) {
		self.visited.clear();
	}

	pub fn len(&self) -> usize {
		self.visited.len()
	}

	pub fn is_empty(&self) -> bool {
		self.visited.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use jsonld_hydra_resource::{DomainObject, Record};
	use rstest::rstest;
	use std::sync::Arc;

	struct Node;

	impl DomainObject for Node {
		fn type_name(&self) -> &str {
			"graph::Node"
		}

		fn fields(&self) -> Record {
			Record::new()
		}
	}

	#[rstest]
	fn test_clones_of_one_arc_share_identity() {
		let node: ObjectRef = Arc::new(Node);
		let alias = Arc::clone(&node);
		let mut context = TraversalContext::new();

		assert!(context.visit(&node));
		assert!(context.is_visited(&alias));
		assert!(!context.visit(&alias));
	}

	#[rstest]
	fn test_distinct_objects_are_tracked_separately() {
		let first: ObjectRef = Arc::new(Node);
		let second: ObjectRef = Arc::new(Node);
		let mut context = TraversalContext::new();

		assert!(context.visit(&first));
		assert!(context.visit(&second));
		assert_eq!(context.len(), 2);

		context.clear();
		assert!(context.is_empty());
	}
}
