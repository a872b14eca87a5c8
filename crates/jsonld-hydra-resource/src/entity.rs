//! A single renderable resource.

use jsonld_hydra_core::{Error, PropertyCollection, Result};
use serde_json::Value;

use crate::object::{ObjectRef, Record, record_from_json};

/// Resources owning a [`PropertyCollection`].
pub trait PropertyCollectionAware {
	fn properties(&self) -> &PropertyCollection;

	fn properties_mut(&mut self) -> &mut PropertyCollection;
}

/// What an entity renders.
#[derive(Debug, Clone)]
pub enum EntityPayload {
	/// Already-plain fields.
	Record(Record),
	/// Hydrated through the entity extractor at render time.
	Object(ObjectRef),
}

/// Payload plus identifier plus the entity's relations.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_resource::Entity;
/// use serde_json::json;
///
/// let entity = Entity::from_value(json!({"id": 1, "name": "foo"}), Some(json!(1))).unwrap();
/// assert_eq!(entity.id(), Some(&json!(1)));
/// assert!(entity.properties().is_empty());
///
/// assert!(Entity::from_value(json!("scalar"), None).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Entity {
	payload: EntityPayload,
	id: Option<Value>,
	properties: PropertyCollection,
}

impl Entity {
	pub fn new(payload: EntityPayload, id: Option<Value>) -> Self {
		Self {
			payload,
			id,
			properties: PropertyCollection::new(),
		}
	}

	pub fn from_object(object: ObjectRef, id: Option<Value>) -> Self {
		Self::new(EntityPayload::Object(object), id)
	}

	pub fn from_record(record: Record, id: Option<Value>) -> Self {
		Self::new(EntityPayload::Record(record), id)
	}

	/// Entity from a JSON payload. Objects map to records and arrays to
	/// records keyed by position; scalars are rejected.
	pub fn from_value(payload: Value, id: Option<Value>) -> Result<Self> {
		let record = match payload {
			Value::Object(map) => record_from_json(map),
			Value::Array(items) => items
				.into_iter()
				.enumerate()
				.map(|(index, item)| (index.to_string(), item.into()))
				.collect(),
			other => {
				return Err(Error::InvalidEntity(format!(
					"expected an object or array payload; received {other}"
				)));
			}
		};
		Ok(Self::from_record(record, id))
	}

	pub fn payload(&self) -> &EntityPayload {
		&self.payload
	}

	pub fn id(&self) -> Option<&Value> {
		self.id.as_ref()
	}

	pub fn properties(&self) -> &PropertyCollection {
		&self.properties
	}

	pub fn properties_mut(&mut self) -> &mut PropertyCollection {
		&mut self.properties
	}

	pub fn set_properties(&mut self, properties: PropertyCollection) -> &mut Self {
		self.properties = properties;
		self
	}
}

impl PropertyCollectionAware for Entity {
	fn properties(&self) -> &PropertyCollection {
		&self.properties
	}

	fn properties_mut(&mut self) -> &mut PropertyCollection {
		&mut self.properties
	}
}
