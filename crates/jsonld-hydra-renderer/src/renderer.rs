//! The JSON-LD rendering engine.
//!
//! [`JsonLdRenderer`] walks entities and collections, hydrates domain
//! objects, converts metadata-described objects into resources, splices
//! embedded resources in place and merges extracted relations over the
//! payload. Traversal state lives in a [`TraversalContext`] created per call,
//! so one renderer can serve concurrent callers.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use jsonld_hydra_core::merge::{merge_maps, merge_values};
use jsonld_hydra_core::{
	ApiProblem, Error, ExtractProperty, ID_KEYWORD, JsonMap, Property, PropertyCollection, PropertyCollectionExtractor,
	PropertyExtractor, PropertySlot, Result, RouteTable, ServerUrl, StaticServerUrl, UrlReverser,
};
use jsonld_hydra_resource::pagination::VIEW_KEYWORD;
use jsonld_hydra_resource::{
	Collection, CollectionPayload, Entity, EntityExtractor, EntityHydratorManager, EntityPayload, Field,
	HydratorRegistry, InjectPagination, Metadata, MetadataMap, ObjectRef, PaginationInjector,
	PaginationStatus, PropertyCollectionAware, Record, Resource, ResourceFactory, record_from_json,
};
use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use crate::context::TraversalContext;
use crate::hooks::{CollectionMemberEvent, RenderHooks};
use crate::identifier::{IdentifierResolver, IdentifierResolverChain, IdentifierSubject};
use crate::settings::{JsonLdSettings, RendererOptions, SettingsError};

pub const HYDRA_CONTEXT: &str = "http://www.w3.org/ns/hydra/context.jsonld";
pub const COLLECTION_TYPE: &str = "Collection";
pub const PARTIAL_COLLECTION_VIEW_TYPE: &str = "PartialCollectionView";
pub const TOTAL_ITEMS_KEY: &str = "totalItems";
pub const ITEMS_PER_PAGE_KEY: &str = "itemsPerPage";
/// Member field whose [`PropertyCollection`] becomes the member's relations.
pub const MEMBER_PROPERTIES_FIELD: &str = "properties";

/// Result of rendering a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
	Document(JsonMap),
	/// The request cannot be satisfied; translate it into a response.
	Problem(ApiProblem),
}

impl Rendered {
	pub fn document(&self) -> Option<&JsonMap> {
		match self {
			Rendered::Document(document) => Some(document),
			Rendered::Problem(_) => None,
		}
	}

	pub fn into_document(self) -> Option<JsonMap> {
		match self {
			Rendered::Document(document) => Some(document),
			Rendered::Problem(_) => None,
		}
	}

	pub fn problem(&self) -> Option<&ApiProblem> {
		match self {
			Rendered::Document(_) => None,
			Rendered::Problem(problem) => Some(problem),
		}
	}

	pub fn is_problem(&self) -> bool {
		matches!(self, Rendered::Problem(_))
	}

	/// JSON form; problems serialise to `{type, title, status, detail}`.
	pub fn to_value(&self) -> Result<Value> {
		match self {
			Rendered::Document(document) => Ok(Value::Object(document.clone())),
			Rendered::Problem(problem) => {
				serde_json::to_value(problem).map_err(|error| Error::Runtime(error.to_string()))
			}
		}
	}
}

/// Builder for [`JsonLdRenderer`].
///
/// Unset collaborators default to an empty [`RouteTable`], a blank server
/// URL and the stock [`PaginationInjector`].
pub struct JsonLdRendererBuilder {
	metadata_map: MetadataMap,
	hydrators: HydratorRegistry,
	default_hydrator: Option<String>,
	class_hydrators: IndexMap<String, String>,
	url_reverser: Arc<dyn UrlReverser>,
	server_url: Arc<dyn ServerUrl>,
	pagination_injector: Arc<dyn InjectPagination>,
	identifiers: IdentifierResolverChain,
	hooks: RenderHooks,
	render_embedded_entities: bool,
	render_collections: bool,
}

impl Default for JsonLdRendererBuilder {
	fn default() -> Self {
		Self {
			metadata_map: MetadataMap::new(),
			hydrators: HydratorRegistry::new(),
			default_hydrator: None,
			class_hydrators: IndexMap::new(),
			url_reverser: Arc::new(RouteTable::new()),
			server_url: Arc::new(StaticServerUrl::new("")),
			pagination_injector: Arc::new(PaginationInjector),
			identifiers: IdentifierResolverChain::new(),
			hooks: RenderHooks::new(),
			render_embedded_entities: true,
			render_collections: true,
		}
	}
}

impl JsonLdRendererBuilder {
	pub fn metadata_map(mut self, metadata_map: MetadataMap) -> Self {
		self.metadata_map = metadata_map;
		self
	}

	pub fn hydrators(mut self, hydrators: HydratorRegistry) -> Self {
		self.hydrators = hydrators;
		self
	}

	/// Registered hydrator used when nothing more specific applies.
	pub fn default_hydrator(mut self, name: impl Into<String>) -> Self {
		self.default_hydrator = Some(name.into());
		self
	}

	/// Use the registered hydrator `name` for objects of `class`.
	pub fn hydrator_for(mut self, class: impl Into<String>, name: impl Into<String>) -> Self {
		self.class_hydrators.insert(class.into(), name.into());
		self
	}

	pub fn url_reverser(mut self, url_reverser: impl UrlReverser + 'static) -> Self {
		self.url_reverser = Arc::new(url_reverser);
		self
	}

	pub fn server_url(mut self, server_url: impl ServerUrl + 'static) -> Self {
		self.server_url = Arc::new(server_url);
		self
	}

	pub fn pagination_injector(mut self, injector: impl InjectPagination + 'static) -> Self {
		self.pagination_injector = Arc::new(injector);
		self
	}

	pub fn identifier_resolver(mut self, resolver: impl IdentifierResolver + 'static) -> Self {
		self.identifiers.register(resolver);
		self
	}

	pub fn hooks(mut self, hooks: RenderHooks) -> Self {
		self.hooks = hooks;
		self
	}

	pub fn render_embedded_entities(mut self, enabled: bool) -> Self {
		self.render_embedded_entities = enabled;
		self
	}

	pub fn render_collections(mut self, enabled: bool) -> Self {
		self.render_collections = enabled;
		self
	}

	/// Apply hydrator selection and render switches from settings.
	pub fn options(mut self, options: &RendererOptions) -> Self {
		self.default_hydrator = options.default_hydrator.clone();
		self.class_hydrators.extend(options.hydrators.clone());
		self.render_embedded_entities = options.render_embedded_entities;
		self.render_collections = options.render_collections;
		self
	}

	/// Wire the collaborators. Fails when a hydrator name is not registered.
	pub fn build(self) -> Result<JsonLdRenderer> {
		let metadata_map = Arc::new(self.metadata_map);

		let mut manager = EntityHydratorManager::new(self.hydrators, Arc::clone(&metadata_map));
		if let Some(name) = &self.default_hydrator {
			manager.set_default_hydrator(name)?;
		}
		for (class, name) in &self.class_hydrators {
			manager.add_hydrator(class.clone(), name)?;
		}
		let entity_extractor = Arc::new(EntityExtractor::new(Arc::new(manager)));

		let property_extractor = Arc::new(PropertyExtractor::new(self.url_reverser, self.server_url));

		Ok(JsonLdRenderer {
			resource_factory: ResourceFactory::new(Arc::clone(&entity_extractor)),
			metadata_map,
			entity_extractor,
			properties_extractor: PropertyCollectionExtractor::new(property_extractor.clone()),
			property_extractor,
			pagination_injector: self.pagination_injector,
			identifiers: self.identifiers,
			hooks: self.hooks,
			render_embedded_entities: self.render_embedded_entities,
			render_collections: self.render_collections,
		})
	}
}

/// Renders [`Entity`] and [`Collection`] resources to JSON-LD maps.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_core::{Property, RouteTable, StaticServerUrl};
/// use jsonld_hydra_renderer::JsonLdRenderer;
/// use jsonld_hydra_resource::Entity;
/// use serde_json::json;
///
/// let renderer = JsonLdRenderer::builder()
/// 	.url_reverser(RouteTable::new().with_route("user", "/users/{id}"))
/// 	.server_url(StaticServerUrl::new("http://localhost.localdomain"))
/// 	.build()
/// 	.unwrap();
///
/// let mut entity = Entity::from_value(json!({"id": "matthew", "name": "Matthew"}), None).unwrap();
/// let mut self_link = Property::new("id");
/// self_link.set_route("user", Some(json!({"id": "matthew"}).as_object().cloned().unwrap()), None).unwrap();
/// entity.properties_mut().add(self_link, false);
///
/// let rendered = renderer.render_entity(&entity).unwrap();
///
/// assert_eq!(rendered["id"], json!("http://localhost.localdomain/users/matthew"));
/// assert_eq!(rendered["name"], json!("Matthew"));
/// ```
pub struct JsonLdRenderer {
	metadata_map: Arc<MetadataMap>,
	resource_factory: ResourceFactory,
	entity_extractor: Arc<EntityExtractor>,
	property_extractor: Arc<PropertyExtractor>,
	properties_extractor: PropertyCollectionExtractor,
	pagination_injector: Arc<dyn InjectPagination>,
	identifiers: IdentifierResolverChain,
	hooks: RenderHooks,
	render_embedded_entities: bool,
	render_collections: bool,
}

impl JsonLdRenderer {
	pub fn builder() -> JsonLdRendererBuilder {
		JsonLdRendererBuilder::default()
	}

	/// Renderer configured from settings.
	///
	/// `hydrators` must register every hydrator name the settings mention.
	pub fn from_settings(
		settings: &JsonLdSettings,
		hydrators: HydratorRegistry,
		url_reverser: impl UrlReverser + 'static,
		server_url: impl ServerUrl + 'static,
	) -> std::result::Result<Self, SettingsError> {
		let metadata_map = settings.build_metadata_map(&hydrators)?;
		let renderer = Self::builder()
			.metadata_map(metadata_map)
			.hydrators(hydrators)
			.options(&settings.renderer)
			.url_reverser(url_reverser)
			.server_url(server_url)
			.build()?;
		debug!(classes = renderer.metadata_map.len(), "renderer built from settings");
		Ok(renderer)
	}

	/// Renderer configured from a `.toml` or `.json` settings file.
	pub fn from_settings_file(
		path: impl AsRef<Path>,
		hydrators: HydratorRegistry,
		url_reverser: impl UrlReverser + 'static,
		server_url: impl ServerUrl + 'static,
	) -> std::result::Result<Self, SettingsError> {
		let settings = JsonLdSettings::from_file(path)?;
		Self::from_settings(&settings, hydrators, url_reverser, server_url)
	}

	pub fn metadata_map(&self) -> &Arc<MetadataMap> {
		&self.metadata_map
	}

	pub fn resource_factory(&self) -> &ResourceFactory {
		&self.resource_factory
	}

	pub fn entity_extractor(&self) -> &Arc<EntityExtractor> {
		&self.entity_extractor
	}

	pub fn property_extractor(&self) -> &Arc<PropertyExtractor> {
		&self.property_extractor
	}

	pub fn hooks_mut(&mut self) -> &mut RenderHooks {
		&mut self.hooks
	}

	pub fn identifier_resolvers_mut(&mut self) -> &mut IdentifierResolverChain {
		&mut self.identifiers
	}

	pub fn render_embedded_entities(&self) -> bool {
		self.render_embedded_entities
	}

	pub fn set_render_embedded_entities(&mut self, enabled: bool) -> &mut Self {
		self.render_embedded_entities = enabled;
		self
	}

	pub fn render_collections(&self) -> bool {
		self.render_collections
	}

	pub fn set_render_collections(&mut self, enabled: bool) -> &mut Self {
		self.render_collections = enabled;
		self
	}

	pub fn render(&self, resource: &Resource) -> Result<Rendered> {
		match resource {
			Resource::Entity(entity) => self.render_entity(entity).map(Rendered::Document),
			Resource::Collection(collection) => self.render_collection(collection),
		}
	}

	/// Render a metadata-described object as the resource its metadata
	/// declares.
	pub fn render_object(&self, object: &ObjectRef) -> Result<Rendered> {
		let Some(metadata) = self.metadata_map.get(object.as_ref()) else {
			return Err(Error::InvalidArgument(format!(
				"No metadata registered for objects of type \"{}\"",
				object.type_name()
			)));
		};
		let resource = self.resource_factory.create_entity_from_metadata(object, metadata, true)?;
		self.render(&resource)
	}

	/// Render an entity with its payload, starting at depth 0 with the
	/// depth limit taken from metadata.
	pub fn render_entity(&self, entity: &Entity) -> Result<JsonMap> {
		self.render_entity_with(entity, true, 0, None)
	}

	/// Render an entity.
	///
	/// With `render_payload` off, or past `max_depth`, only the entity's
	/// relations render. Without a depth limit, reaching an object already
	/// on the render path fails with [`Error::CircularReference`].
	pub fn render_entity_with(
		&self,
		entity: &Entity,
		render_payload: bool,
		depth: usize,
		max_depth: Option<usize>,
	) -> Result<JsonMap> {
		debug!(depth, ?max_depth, render_payload, "rendering entity");
		let mut context = TraversalContext::new();
		self.render_entity_in(&mut context, entity, render_payload, depth, max_depth)
	}

	/// Render a collection to a Hydra `Collection` document, or to a problem
	/// when the requested page does not exist.
	pub fn render_collection(&self, collection: &Collection) -> Result<Rendered> {
		debug!(
			collection = collection.collection_name(),
			paginated = collection.is_paginated(),
			"rendering collection"
		);
		self.hooks.render_collection(collection);

		let mut collection = collection.clone();
		if let PaginationStatus::Problem(problem) = self.pagination_injector.inject_pagination_properties(&mut collection)? {
			return Ok(Rendered::Problem(problem));
		}

		let max_depth = match collection.payload() {
			CollectionPayload::Object(object) => self.metadata_map.get(object.as_ref()).and_then(Metadata::max_depth),
			_ => None,
		};

		let mut payload = collection.attributes().clone();
		merge_maps(&mut payload, self.properties_extractor.extract(collection.properties())?);

		let mut context = TraversalContext::new();
		let members = Value::Array(self.extract_collection_in(&mut context, &collection, 0, max_depth)?);
		match payload.get_mut(collection.collection_name()) {
			Some(existing) => merge_values(existing, members),
			None => {
				payload.insert(collection.collection_name().to_string(), members);
			}
		}

		if let Some(paginator) = collection.paginator() {
			let items_per_page = payload
				.get(ITEMS_PER_PAGE_KEY)
				.cloned()
				.unwrap_or_else(|| json!(collection.page_size()));
			if let Some(Value::Object(view)) = payload.get_mut(VIEW_KEYWORD) {
				view.entry("@type").or_insert_with(|| json!(PARTIAL_COLLECTION_VIEW_TYPE));
				view.entry(ITEMS_PER_PAGE_KEY).or_insert(items_per_page);
			}
			let total = paginator.total_item_count();
			payload.entry(TOTAL_ITEMS_KEY).or_insert_with(|| json!(total));
		} else if let Some(count) = collection.count() {
			payload.entry(TOTAL_ITEMS_KEY).or_insert_with(|| json!(count));
		}

		payload.insert("@context".to_string(), json!(HYDRA_CONTEXT));
		payload.insert("@type".to_string(), json!(COLLECTION_TYPE));

		self.hooks.render_collection_post(&mut payload, &collection);
		Ok(Rendered::Document(payload))
	}

	/// Rendered members of `collection`.
	pub fn extract_collection(
		&self,
		collection: &Collection,
		depth: usize,
		max_depth: Option<usize>,
	) -> Result<Vec<Value>> {
		let mut context = TraversalContext::new();
		self.extract_collection_in(&mut context, collection, depth, max_depth)
	}

	/// Entity for `payload` with an `id` self link on `route`, unless the
	/// payload's metadata turns forced ids off or a self link exists.
	pub fn create_entity(&self, payload: Field, route: &str, route_identifier_name: &str) -> Result<Entity> {
		let (mut entity, force_id) = match payload {
			Field::Object(object) => match self.metadata_map.get(object.as_ref()) {
				Some(metadata) => {
					let force_id = metadata.force_id_property();
					match self.resource_factory.create_entity_from_metadata(&object, metadata, true)? {
						Resource::Entity(entity) => (entity, force_id),
						Resource::Collection(_) => {
							return Err(Error::InvalidEntity(format!(
								"metadata for \"{}\" describes a collection",
								object.type_name()
							)));
						}
					}
				}
				None => {
					let fields = plain_fields(&self.entity_extractor.extract(object.as_ref())?);
					let id = self.identifiers.resolve(IdentifierSubject {
						record: &fields,
						object: Some(object.as_ref()),
						identifier_name: ID_KEYWORD,
					});
					(Entity::from_object(object, id), true)
				}
			},
			Field::Entity(entity) => (*entity, true),
			Field::Value(value) => {
				let id = value.as_object().and_then(|record| {
					self.identifiers.resolve(IdentifierSubject {
						record,
						object: None,
						identifier_name: ID_KEYWORD,
					})
				});
				(Entity::from_value(value, id)?, true)
			}
			other => {
				return Err(Error::InvalidEntity(format!(
					"cannot create an entity from {}",
					field_kind(&other)
				)));
			}
		};

		if force_id {
			let mut params = JsonMap::new();
			params.insert(
				route_identifier_name.to_string(),
				entity.id().cloned().unwrap_or(Value::Null),
			);
			self.inject_id_property(&mut entity, route, params)?;
		}
		Ok(entity)
	}

	/// Collection for `payload` with an `id` self link on `route` unless one
	/// exists.
	pub fn create_collection(&self, payload: Field, route: &str) -> Result<Collection> {
		let mut collection = match payload {
			Field::Collection(collection) => *collection,
			Field::Object(object) => match self.metadata_map.get(object.as_ref()) {
				Some(metadata) => self.resource_factory.create_collection_from_metadata(&object, metadata)?,
				None => Collection::from_object(object)?,
			},
			Field::Value(value) => Collection::from_value(value)?,
			Field::List(members) => Collection::from_fields(members),
			other => {
				return Err(Error::InvalidCollection(format!(
					"cannot create a collection from {}",
					field_kind(&other)
				)));
			}
		};
		self.inject_id_property(&mut collection, route, JsonMap::new())?;
		Ok(collection)
	}

	/// Add an `id` relation pointing at `route` unless the resource has one.
	pub fn inject_id_property<R>(&self, resource: &mut R, route: &str, params: JsonMap) -> Result<()>
	where
		R: PropertyCollectionAware,
	{
		let properties = resource.properties_mut();
		if properties.has(ID_KEYWORD) {
			return Ok(());
		}
		let mut property = Property::new(ID_KEYWORD);
		property.set_route(route, Some(params), None)?;
		properties.add(property, false);
		Ok(())
	}

	fn render_entity_in(
		&self,
		context: &mut TraversalContext,
		entity: &Entity,
		render_payload: bool,
		depth: usize,
		max_depth: Option<usize>,
	) -> Result<JsonMap> {
		self.hooks.render_entity(entity);

		let mut properties = entity.properties().clone();
		let mut max_depth = max_depth;
		let mut tracked = None;

		if let EntityPayload::Object(object) = entity.payload() {
			if max_depth.is_none() {
				max_depth = self.metadata_map.get(object.as_ref()).and_then(Metadata::max_depth);
			}
			if max_depth.is_none() {
				if !context.visit(object) {
					return Err(self.circular_reference(context, object));
				}
				tracked = Some(object);
			}
		}

		let mut payload = JsonMap::new();
		let blank = !render_payload || max_depth.is_some_and(|limit| depth > limit);
		if !blank {
			let record = match entity.payload() {
				EntityPayload::Record(record) => record.clone(),
				EntityPayload::Object(object) => self.entity_extractor.extract(object.as_ref())?,
			};
			for (key, field) in record {
				match self.resolve_metadata(field, self.render_embedded_entities)? {
					Field::Entity(embedded) => {
						let rendered = self.render_entity_in(context, &embedded, true, depth + 1, max_depth)?;
						payload.insert(key, Value::Object(rendered));
					}
					Field::Collection(embedded) => {
						let members = self.extract_collection_in(context, &embedded, depth + 1, max_depth)?;
						payload.insert(key, Value::Array(members));
					}
					Field::Property(property) => inject_property(&mut properties, property),
					Field::Properties(collection) => merge_property_collection(&mut properties, collection),
					other => {
						let value = self.plain_value(context, other, depth, max_depth)?;
						payload.insert(key, value);
					}
				}
			}
		}

		merge_maps(&mut payload, self.properties_extractor.extract(&properties)?);

		if let Some(object) = tracked {
			context.leave(object);
		}
		self.hooks.render_entity_post(&mut payload, entity);
		Ok(payload)
	}

	fn extract_collection_in(
		&self,
		context: &mut TraversalContext,
		collection: &Collection,
		depth: usize,
		max_depth: Option<usize>,
	) -> Result<Vec<Value>> {
		let mut members = Vec::new();

		for member in collection.members()? {
			let mut event = CollectionMemberEvent {
				collection,
				member,
				route: collection.entity_route().map(str::to_string),
				route_params: collection.entity_route_params().clone(),
				route_options: collection.entity_route_options().clone(),
			};
			self.hooks.collection_member(&mut event);
			let CollectionMemberEvent {
				member,
				route,
				route_params,
				route_options,
				..
			} = event;

			let (record, source) = match self.resolve_metadata(member, true)? {
				Field::Entity(entity) => {
					let rendered = self.render_entity_in(context, &entity, self.render_collections, depth, max_depth)?;
					members.push(Value::Object(rendered));
					continue;
				}
				Field::Object(object) => (self.entity_extractor.extract(object.as_ref())?, Some(object)),
				Field::Value(Value::Object(map)) => (record_from_json(map), None),
				other => {
					members.push(self.plain_value(context, other, depth, max_depth)?);
					continue;
				}
			};

			if let Some(object) = &source
				&& !context.visit(object)
			{
				return Err(self.circular_reference(context, object));
			}

			let mut item = JsonMap::new();
			let mut adopted = None;
			let mut declared = PropertyCollection::new();
			for (key, field) in record {
				match self.resolve_metadata(field, self.render_embedded_entities)? {
					Field::Entity(embedded) => {
						let rendered = self.render_entity_in(context, &embedded, true, depth + 1, max_depth)?;
						item.insert(key, Value::Object(rendered));
					}
					Field::Collection(embedded) => {
						let nested = self.extract_collection_in(context, &embedded, depth + 1, max_depth)?;
						item.insert(key, Value::Array(nested));
					}
					Field::Properties(properties) if key == MEMBER_PROPERTIES_FIELD => adopted = Some(properties),
					Field::Property(property) => inject_property(&mut declared, property),
					Field::Properties(properties) => merge_property_collection(&mut declared, properties),
					other => {
						let value = self.plain_value(context, other, depth + 1, max_depth)?;
						item.insert(key, value);
					}
				}
			}

			if let Some(object) = &source {
				context.leave(object);
			}

			let id = self.identifiers.resolve(IdentifierSubject {
				record: &item,
				object: source.as_deref(),
				identifier_name: collection.entity_identifier_name(),
			});

			let Some(id) = id else {
				trace!("collection member has no identifier; rendered as-is");
				if !declared.is_empty() {
					merge_maps(&mut item, self.properties_extractor.extract(&declared)?);
				}
				members.push(Value::Object(item));
				continue;
			};

			let mut properties = adopted
				.or_else(|| collection.entity_properties().cloned())
				.unwrap_or_default();
			merge_property_collection(&mut properties, declared);

			if !item.contains_key(ID_KEYWORD) && !properties.has(ID_KEYWORD) {
				let Some(route) = route else {
					return Err(Error::Runtime(format!(
						"Unable to create a self link for a member of collection \"{}\"; no entity route is configured",
						collection.collection_name()
					)));
				};
				let mut params = route_params;
				params.insert(collection.route_identifier_name().to_string(), id);
				let mut self_link = Property::new(ID_KEYWORD);
				self_link.set_route(route, Some(params), Some(route_options))?;
				properties.add(self_link, true);
			}

			merge_maps(&mut item, self.properties_extractor.extract(&properties)?);
			members.push(Value::Object(item));
		}

		trace!(count = members.len(), depth, "collection members extracted");
		Ok(members)
	}

	/// Plain JSON for a field that is not spliced as a resource at the
	/// current level.
	fn plain_value(
		&self,
		context: &mut TraversalContext,
		field: Field,
		depth: usize,
		max_depth: Option<usize>,
	) -> Result<Value> {
		Ok(match self.resolve_metadata(field, self.render_embedded_entities)? {
			Field::Value(value) => value,
			Field::Entity(entity) => Value::Object(self.render_entity_in(context, &entity, true, depth + 1, max_depth)?),
			Field::Collection(collection) => {
				Value::Array(self.extract_collection_in(context, &collection, depth + 1, max_depth)?)
			}
			Field::Object(object) => {
				if !context.visit(&object) {
					return Err(self.circular_reference(context, &object));
				}
				let record = self.entity_extractor.extract(object.as_ref())?;
				let mut fields = JsonMap::new();
				for (key, field) in record {
					fields.insert(key, self.plain_value(context, field, depth + 1, max_depth)?);
				}
				context.leave(&object);
				Value::Object(fields)
			}
			Field::Property(property) => self.property_extractor.extract(&property)?,
			Field::Properties(properties) => Value::Object(self.properties_extractor.extract(&properties)?),
			Field::List(items) => Value::Array(
				items
					.into_iter()
					.map(|item| self.plain_value(context, item, depth, max_depth))
					.collect::<Result<_>>()?,
			),
		})
	}

	/// Metadata-described objects become entities or collections; anything
	/// else passes through.
	fn resolve_metadata(&self, field: Field, render_embedded: bool) -> Result<Field> {
		let object = match field {
			Field::Object(object) => object,
			other => return Ok(other),
		};
		match self.metadata_map.get(object.as_ref()) {
			Some(metadata) => {
				trace!(class = object.type_name(), "object converted through metadata");
				Ok(self
					.resource_factory
					.create_entity_from_metadata(&object, metadata, render_embedded)?
					.into())
			}
			None => Ok(Field::Object(object)),
		}
	}

	fn circular_reference(&self, context: &mut TraversalContext, object: &ObjectRef) -> Error {
		context.clear();
		warn!(class = object.type_name(), "circular reference detected");
		Error::CircularReference {
			class: object.type_name().to_string(),
		}
	}
}

impl std::fmt::Debug for JsonLdRenderer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("JsonLdRenderer")
			.field("metadata_map", &self.metadata_map)
			.field("identifiers", &self.identifiers)
			.field("hooks", &self.hooks)
			.field("render_embedded_entities", &self.render_embedded_entities)
			.field("render_collections", &self.render_collections)
			.finish_non_exhaustive()
	}
}

/// Add `property` unless an identical one is already stored under its
/// keyword.
fn inject_property(properties: &mut PropertyCollection, property: Property) {
	if properties
		.get(property.keyword())
		.is_some_and(|slot| slot.contains(&property))
	{
		return;
	}
	trace!(keyword = property.keyword(), "relation injected");
	properties.add(property, false);
}

fn merge_property_collection(target: &mut PropertyCollection, source: PropertyCollection) {
	for (keyword, slot) in &source {
		inject_slot(target, keyword, slot.clone());
	}
}

fn inject_slot(target: &mut PropertyCollection, keyword: &str, slot: PropertySlot) {
	match slot {
		PropertySlot::Single(property) => inject_property(target, property),
		PropertySlot::Nested(nested) => {
			if !matches!(target.get(keyword), Some(PropertySlot::Nested(existing)) if *existing == nested) {
				target.add_nested(keyword, nested, false);
			}
		}
		PropertySlot::Many(slots) => {
			for slot in slots {
				inject_slot(target, keyword, slot);
			}
		}
	}
}

fn plain_fields(record: &Record) -> JsonMap {
	record
		.iter()
		.filter_map(|(key, field)| field.as_value().map(|value| (key.clone(), value.clone())))
		.collect()
}

fn field_kind(field: &Field) -> &'static str {
	match field {
		Field::Value(_) => "a scalar value",
		Field::Object(_) => "an object",
		Field::Entity(_) => "an entity",
		Field::Collection(_) => "a collection",
		Field::Property(_) => "a property",
		Field::Properties(_) => "a property collection",
		Field::List(_) => "a list",
	}
}
