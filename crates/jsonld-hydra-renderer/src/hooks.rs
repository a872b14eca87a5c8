//! Listener points around rendering.
//!
//! Listeners run synchronously in registration order. Pre-render listeners
//! observe the resource; post-render listeners may rewrite the produced
//! payload; member listeners may swap the member or its link route before the
//! member is rendered.

use std::fmt;

use jsonld_hydra_core::JsonMap;
use jsonld_hydra_resource::{Collection, Entity, Field};

/// A collection member about to be rendered.
#[derive(Debug)]
pub struct CollectionMemberEvent<'a> {
	/// Collection being iterated.
	pub collection: &'a Collection,
	/// Member to render. Listeners may replace it.
	pub member: Field,
	/// Route for the member's self link.
	pub route: Option<String>,
	pub route_params: JsonMap,
	pub route_options: JsonMap,
}

type EntityListener = Box<dyn Fn(&Entity) + Send + Sync>;
type EntityPostListener = Box<dyn Fn(&mut JsonMap, &Entity) + Send + Sync>;
type CollectionListener = Box<dyn Fn(&Collection) + Send + Sync>;
type CollectionPostListener = Box<dyn Fn(&mut JsonMap, &Collection) + Send + Sync>;
type MemberListener = Box<dyn Fn(&mut CollectionMemberEvent<'_>) + Send + Sync>;

/// Registered render listeners.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_renderer::RenderHooks;
/// use serde_json::json;
///
/// let mut hooks = RenderHooks::new();
/// hooks.on_render_collection_post(|payload, _| {
/// 	payload.insert("generator".to_string(), json!("hydra"));
/// });
///
/// assert_eq!(hooks.len(), 1);
/// ```
#[derive(Default)]
pub struct RenderHooks {
	render_entity: Vec<EntityListener>,
	render_entity_post: Vec<EntityPostListener>,
	render_collection: Vec<CollectionListener>,
	render_collection_post: Vec<CollectionPostListener>,
	collection_member: Vec<MemberListener>,
}

impl RenderHooks {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn on_render_entity<F>(&mut self, listener: F) -> &mut Self
	where
		F: Fn(&Entity) + Send + Sync + 'static,
	{
		self.render_entity.push(Box::new(listener));
		self
	}

	pub fn on_render_entity_post<F>(&mut self, listener: F) -> &mut Self
	where
		F: Fn(&mut JsonMap, &Entity) + Send + Sync + 'static,
	{
		self.render_entity_post.push(Box::new(listener));
		self
	}

	pub fn on_render_collection<F>(&mut self, listener: F) -> &mut Self
	where
		F: Fn(&Collection) + Send + Sync + 'static,
	{
		self.render_collection.push(Box::new(listener));
		self
	}

	pub fn on_render_collection_post<F>(&mut self, listener: F) -> &mut Self
	where
		F: Fn(&mut JsonMap, &Collection) + Send + Sync + 'static,
	{
		self.render_collection_post.push(Box::new(listener));
		self
	}

	pub fn on_collection_member<F>(&mut self, listener: F) -> &mut Self
	where
		F: Fn(&mut CollectionMemberEvent<'_>) + Send + Sync + 'static,
	{
		self.collection_member.push(Box::new(listener));
		self
	}

	/// Total number of registered listeners.
	pub fn len(&self) -> usize {
		self.render_entity.len()
			+ self.render_entity_post.len()
			+ self.render_collection.len()
			+ self.render_collection_post.len()
			+ self.collection_member.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub(crate) fn render_entity(&self, entity: &Entity) {
		for listener in &self.render_entity {
			listener(entity);
		}
	}

	pub(crate) fn render_entity_post(&self, payload: &mut JsonMap, entity: &Entity) {
		for listener in &self.render_entity_post {
			listener(payload, entity);
		}
	}

	pub(crate) fn render_collection(&self, collection: &Collection) {
		for listener in &self.render_collection {
			listener(collection);
		}
	}

	pub(crate) fn render_collection_post(&self, payload: &mut JsonMap, collection: &Collection) {
		for listener in &self.render_collection_post {
			listener(payload, collection);
		}
	}

	pub(crate) fn collection_member(&self, event: &mut CollectionMemberEvent<'_>) {
		for listener in &self.collection_member {
			listener(event);
		}
	}
}

impl fmt::Debug for RenderHooks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RenderHooks")
			.field("render_entity", &self.render_entity.len())
			.field("render_entity_post", &self.render_entity_post.len())
			.field("render_collection", &self.render_collection.len())
			.field("render_collection_post", &self.render_collection_post.len())
			.field("collection_member", &self.collection_member.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[rstest]
	fn test_post_listeners_run_in_registration_order() {
		let mut hooks = RenderHooks::new();
		hooks
			.on_render_entity_post(|payload, _| {
				payload.insert("step".to_string(), json!("first"));
			})
			.on_render_entity_post(|payload, _| {
				payload.insert("step".to_string(), json!("second"));
			});
		let entity = Entity::from_value(json!({}), None).unwrap();
		let mut payload = JsonMap::new();

		hooks.render_entity_post(&mut payload, &entity);

		assert_eq!(payload.get("step"), Some(&json!("second")));
	}

	#[rstest]
	fn test_pre_listeners_observe_each_call() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		let mut hooks = RenderHooks::new();
		hooks.on_render_collection(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		});
		let collection = Collection::from_value(json!([])).unwrap();

		hooks.render_collection(&collection);
		hooks.render_collection(&collection);

		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[rstest]
	fn test_member_listener_rewrites_route() {
		let mut hooks = RenderHooks::new();
		hooks.on_collection_member(|event| {
			event.route = Some("override".to_string());
		});
		let collection = Collection::from_value(json!([])).unwrap();
		let mut event = CollectionMemberEvent {
			collection: &collection,
			member: Field::from(json!({"id": 1})),
			route: None,
			route_params: JsonMap::new(),
			route_options: JsonMap::new(),
		};

		hooks.collection_member(&mut event);

		assert_eq!(event.route.as_deref(), Some("override"));
	}
}
