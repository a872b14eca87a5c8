//! Building entities and collections from metadata-described objects.

use std::sync::Arc;

use jsonld_hydra_core::{Error, ID_KEYWORD, JsonMap, Property, PropertyCollection, Result};
use serde_json::Value;
use tracing::trace;

use crate::collection::Collection;
use crate::entity::{Entity, EntityPayload};
use crate::hydrator::EntityExtractor;
use crate::metadata::Metadata;
use crate::object::{DomainObject, Field, ObjectRef, Record};

/// Outcome of converting an object through its metadata.
#[derive(Debug, Clone)]
pub enum Resource {
	Entity(Entity),
	Collection(Collection),
}

impl From<Resource> for Field {
	fn from(resource: Resource) -> Self {
		match resource {
			Resource::Entity(entity) => Field::Entity(Box::new(entity)),
			Resource::Collection(collection) => Field::Collection(Box::new(collection)),
		}
	}
}

/// Turns domain objects into [`Entity`] or [`Collection`] instances using
/// their [`Metadata`].
#[derive(Clone)]
pub struct ResourceFactory {
	entity_extractor: Arc<EntityExtractor>,
}

impl ResourceFactory {
	pub fn new(entity_extractor: Arc<EntityExtractor>) -> Self {
		Self { entity_extractor }
	}

	pub fn entity_extractor(&self) -> &Arc<EntityExtractor> {
		&self.entity_extractor
	}

	/// Convert `object` to an entity, or to a collection when the metadata
	/// describes one.
	///
	/// With `render_embedded_entities` off the entity keeps its identifier and
	/// relations but renders an empty payload.
	pub fn create_entity_from_metadata(
		&self,
		object: &ObjectRef,
		metadata: &Metadata,
		render_embedded_entities: bool,
	) -> Result<Resource> {
		if metadata.is_collection() {
			return self
				.create_collection_from_metadata(object, metadata)
				.map(Resource::Collection);
		}

		let data = self.entity_extractor.extract(object.as_ref())?;
		let id = match metadata.entity_identifier_name() {
			Some(name) => Some(identifier_from(&data, name).ok_or_else(|| {
				Error::Runtime(format!(
					"Unable to determine entity identifier for object of type \"{}\"; no fields matching \"{}\"",
					object.type_name(),
					name
				))
			})?),
			None => None,
		};

		let payload = if render_embedded_entities {
			EntityPayload::Object(object.clone())
		} else {
			EntityPayload::Record(Record::new())
		};
		let mut entity = Entity::new(payload, id.clone());

		let properties = entity.properties_mut();
		self.marshal_metadata_properties(metadata, properties);

		if metadata.force_id_property() && !properties.has(ID_KEYWORD) {
			let property = self.marshal_property_from_metadata(
				metadata,
				object.as_ref(),
				id.as_ref(),
				metadata.route_identifier_name(),
				ID_KEYWORD,
			)?;
			properties.add(property, false);
		}

		trace!(class = object.type_name(), "entity created from metadata");
		Ok(Resource::Entity(entity))
	}

	pub fn create_collection_from_metadata(&self, object: &ObjectRef, metadata: &Metadata) -> Result<Collection> {
		let mut collection = Collection::from_object(object.clone())?;
		collection.set_collection_name(metadata.collection_name());
		if let Some(route) = metadata.route() {
			collection.set_collection_route(route);
		}
		if let Some(route) = metadata.entity_route() {
			collection.set_entity_route(route);
		}
		if let Some(name) = metadata.route_identifier_name() {
			collection.set_route_identifier_name(name);
		}
		if let Some(name) = metadata.entity_identifier_name() {
			collection.set_entity_identifier_name(name);
		}

		let properties = collection.properties_mut();
		self.marshal_metadata_properties(metadata, properties);

		if metadata.force_id_property()
			&& !properties.has(ID_KEYWORD)
			&& (metadata.has_url() || metadata.has_route())
		{
			let property = self.marshal_property_from_metadata(metadata, object.as_ref(), None, None, ID_KEYWORD)?;
			properties.add(property, false);
		}

		trace!(class = object.type_name(), "collection created from metadata");
		Ok(collection)
	}

	/// Build the `relation` property for `object` from the metadata URL, or
	/// from its route with computed params evaluated against `object` and the
	/// identifier added under `route_identifier_name`.
	pub fn marshal_property_from_metadata(
		&self,
		metadata: &Metadata,
		object: &dyn DomainObject,
		id: Option<&Value>,
		route_identifier_name: Option<&str>,
		relation: &str,
	) -> Result<Property> {
		let mut property = Property::new(relation);
		if let Some(url) = metadata.url() {
			property.set_url(url)?;
			return Ok(property);
		}

		let Some(route) = metadata.route() else {
			return Err(Error::Runtime(format!(
				"Unable to create a self property for resource of type \"{}\"; metadata does not contain a route or a url",
				object.type_name()
			)));
		};

		let mut params: JsonMap = metadata
			.route_params()
			.iter()
			.map(|(name, param)| (name.clone(), param.resolve(object)))
			.collect();
		if let Some(name) = route_identifier_name {
			params.insert(name.to_string(), id.cloned().unwrap_or(Value::Null));
		}

		property.set_route(route, Some(params), Some(metadata.route_options().clone()))?;
		Ok(property)
	}

	pub fn marshal_metadata_properties(&self, metadata: &Metadata, properties: &mut PropertyCollection) {
		for property in metadata.properties() {
			properties.add(property.clone(), false);
		}
	}
}

fn identifier_from(data: &Record, name: &str) -> Option<Value> {
	match data.get(name) {
		Some(Field::Value(Value::Null)) | None => None,
		Some(Field::Value(value)) => Some(value.clone()),
		Some(_) => None,
	}
}
