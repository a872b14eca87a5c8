//! Identifier resolution for collection members.

use std::fmt;
use std::sync::Arc;

use jsonld_hydra_core::JsonMap;
use jsonld_hydra_resource::{DomainObject, Field};
use serde_json::Value;

/// What a resolver may inspect for one member.
#[derive(Clone, Copy)]
pub struct IdentifierSubject<'a> {
	/// Member fields after hydration.
	pub record: &'a JsonMap,
	/// Source object, when the member was one.
	pub object: Option<&'a dyn DomainObject>,
	/// Field carrying the identifier, as configured on the collection.
	pub identifier_name: &'a str,
}

impl fmt::Debug for IdentifierSubject<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("IdentifierSubject")
			.field("record", &self.record)
			.field("object", &self.object.map(|object| object.type_name()))
			.field("identifier_name", &self.identifier_name)
			.finish()
	}
}

/// One capability check in the identifier chain.
///
/// Returning `None`, JSON `null` or `false` passes the member on to the next
/// resolver.
pub trait IdentifierResolver: Send + Sync {
	fn resolve(&self, subject: IdentifierSubject<'_>) -> Option<Value>;
}

impl<F> IdentifierResolver for F
where
	F: Fn(IdentifierSubject<'_>) -> Option<Value> + Send + Sync,
{
	fn resolve(&self, subject: IdentifierSubject<'_>) -> Option<Value> {
		self(subject)
	}
}

/// Reads the identifier field from the hydrated record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordKeyResolver;

impl IdentifierResolver for RecordKeyResolver {
	fn resolve(&self, subject: IdentifierSubject<'_>) -> Option<Value> {
		subject.record.get(subject.identifier_name).cloned()
	}
}

/// Reads the identifier from the source object's public fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicFieldResolver;

impl IdentifierResolver for PublicFieldResolver {
	fn resolve(&self, subject: IdentifierSubject<'_>) -> Option<Value> {
		let mut fields = subject.object?.fields();
		match fields.shift_remove(subject.identifier_name)? {
			Field::Value(value) => Some(value),
			_ => None,
		}
	}
}

/// Calls the source object's identifier accessor.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessorResolver;

impl IdentifierResolver for AccessorResolver {
	fn resolve(&self, subject: IdentifierSubject<'_>) -> Option<Value> {
		subject.object?.identifier()
	}
}

/// Ordered identifier resolvers: registered resolvers first, then record
/// lookup, public field read and accessor call.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_renderer::{IdentifierResolverChain, IdentifierSubject};
/// use serde_json::json;
///
/// let mut chain = IdentifierResolverChain::new();
/// let record = json!({"id": null, "uuid": "abc"}).as_object().cloned().unwrap();
/// let subject = IdentifierSubject { record: &record, object: None, identifier_name: "id" };
///
/// assert_eq!(chain.resolve(subject), None);
///
/// chain.register(|subject: IdentifierSubject<'_>| subject.record.get("uuid").cloned());
/// assert_eq!(chain.resolve(subject), Some(json!("abc")));
/// ```
#[derive(Clone)]
pub struct IdentifierResolverChain {
	registered: Vec<Arc<dyn IdentifierResolver>>,
	defaults: Vec<Arc<dyn IdentifierResolver>>,
}

impl IdentifierResolverChain {
	pub fn new() -> Self {
		Self {
			registered: Vec::new(),
			defaults: vec![
				Arc::new(RecordKeyResolver),
				Arc::new(PublicFieldResolver),
				Arc::new(AccessorResolver),
			],
		}
	}

	/// Add a resolver ahead of the built-in checks.
	pub fn register<R>(&mut self, resolver: R) -> &mut Self
	where
		R: IdentifierResolver + 'static,
	{
		self.registered.push(Arc::new(resolver));
		self
	}

	pub fn register_arc(&mut self, resolver: Arc<dyn IdentifierResolver>) -> &mut Self {
		self.registered.push(resolver);
		self
	}

	/// First usable identifier, if any resolver finds one.
	pub fn resolve(&self, subject: IdentifierSubject<'_>) -> Option<Value> {
		self.registered
			.iter()
			.chain(&self.defaults)
			.filter_map(|resolver| resolver.resolve(subject))
			.find(is_identifier)
	}
}

impl Default for IdentifierResolverChain {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for IdentifierResolverChain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("IdentifierResolverChain")
			.field("registered", &self.registered.len())
			.field("defaults", &self.defaults.len())
			.finish()
	}
}

fn is_identifier(value: &Value) -> bool {
	!matches!(value, Value::Null | Value::Bool(false))
}
