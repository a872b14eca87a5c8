//! Domain objects handed to the renderer.
//!
//! Application types implement [`DomainObject`] to expose their type name,
//! declared ancestors and public fields. Records produced from them are made
//! of [`Field`]s, which may hold plain JSON or further resources.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use jsonld_hydra_core::{Property, PropertyCollection};
use serde_json::{Map, Value};

use crate::collection::Collection;
use crate::entity::Entity;

/// An application object that can be rendered.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_resource::{DomainObject, Field, Record};
/// use serde_json::json;
///
/// struct User {
/// 	id: u64,
/// 	name: String,
/// }
///
/// impl DomainObject for User {
/// 	fn type_name(&self) -> &str {
/// 		"app::User"
/// 	}
///
/// 	fn fields(&self) -> Record {
/// 		Record::from([
/// 			("id".to_string(), Field::from(json!(self.id))),
/// 			("name".to_string(), Field::from(json!(self.name))),
/// 		])
/// 	}
/// }
///
/// let user = User { id: 1, name: "matthew".into() };
/// assert_eq!(user.fields().len(), 2);
/// ```
pub trait DomainObject: Send + Sync + 'static {
	/// Type name used for metadata and hydrator lookup.
	fn type_name(&self) -> &str;

	/// Ancestor and interface names, nearest first. Metadata lookup falls
	/// back to these in order.
	fn ancestors(&self) -> &[&'static str] {
		&[]
	}

	/// Public fields in declaration order.
	fn fields(&self) -> Record;

	/// Value of an identifier accessor, for types exposing one.
	fn identifier(&self) -> Option<Value> {
		None
	}

	/// Members of an iterable object. `None` when the type is not iterable.
	fn members(&self) -> Option<Vec<Field>> {
		None
	}
}

impl fmt::Debug for dyn DomainObject {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DomainObject")
			.field("type_name", &self.type_name())
			.finish_non_exhaustive()
	}
}

/// Shared handle to a domain object.
pub type ObjectRef = Arc<dyn DomainObject>;

/// Identity of the object behind a handle, stable for the handle's lifetime.
pub fn object_id(object: &ObjectRef) -> usize {
	Arc::as_ptr(object) as *const () as usize
}

/// Field name to field value, in insertion order.
pub type Record = IndexMap<String, Field>;

/// Builds a record of plain JSON fields.
pub fn record_from_json(map: Map<String, Value>) -> Record {
	map.into_iter().map(|(key, value)| (key, Field::Value(value))).collect()
}

/// A field of a record.
#[derive(Debug, Clone)]
pub enum Field {
	Value(Value),
	Object(ObjectRef),
	Entity(Box<Entity>),
	Collection(Box<Collection>),
	/// Relation moved into the owning resource's properties when rendered.
	Property(Property),
	Properties(PropertyCollection),
	List(Vec<Field>),
}

impl Field {
	pub fn object(object: impl DomainObject) -> Self {
		Field::Object(Arc::new(object))
	}

	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Field::Value(value) => Some(value),
			_ => None,
		}
	}
}

impl From<Value> for Field {
	fn from(value: Value) -> Self {
		Field::Value(value)
	}
}

impl From<ObjectRef> for Field {
	fn from(object: ObjectRef) -> Self {
		Field::Object(object)
	}
}

impl From<Entity> for Field {
	fn from(entity: Entity) -> Self {
		Field::Entity(Box::new(entity))
	}
}

impl From<Collection> for Field {
	fn from(collection: Collection) -> Self {
		Field::Collection(Box::new(collection))
	}
}

impl From<Property> for Field {
	fn from(property: Property) -> Self {
		Field::Property(property)
	}
}

impl From<PropertyCollection> for Field {
	fn from(properties: PropertyCollection) -> Self {
		Field::Properties(properties)
	}
}
