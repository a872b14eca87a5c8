//! Per-type rendering configuration.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use jsonld_hydra_core::{Error, JsonMap, Property, Result};
use serde_json::Value;

use crate::hydrator::{Hydrator, HydratorRegistry};
use crate::object::DomainObject;

pub const DEFAULT_METADATA_COLLECTION_NAME: &str = "items";

type ComputeParam = dyn Fn(&dyn DomainObject) -> Value + Send + Sync;

/// Route parameter: fixed, or computed from the object being linked.
#[derive(Clone)]
pub enum RouteParam {
	Literal(Value),
	Computed(Arc<ComputeParam>),
}

impl RouteParam {
	pub fn computed<F>(compute: F) -> Self
	where
		F: Fn(&dyn DomainObject) -> Value + Send + Sync + 'static,
	{
		RouteParam::Computed(Arc::new(compute))
	}

	pub fn resolve(&self, subject: &dyn DomainObject) -> Value {
		match self {
			RouteParam::Literal(value) => value.clone(),
			RouteParam::Computed(compute) => compute(subject),
		}
	}
}

impl fmt::Debug for RouteParam {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RouteParam::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			RouteParam::Computed(_) => f.write_str("Computed(..)"),
		}
	}
}

impl From<Value> for RouteParam {
	fn from(value: Value) -> Self {
		RouteParam::Literal(value)
	}
}

/// How objects of one type become entities or collections.
///
/// Built either with the `with_*` methods or from an options record, see
/// [`Metadata::from_options`].
#[derive(Debug, Clone)]
pub struct Metadata {
	class: String,
	collection_name: String,
	hydrator: Option<Arc<dyn Hydrator>>,
	entity_identifier_name: Option<String>,
	route_identifier_name: Option<String>,
	entity_route: Option<String>,
	is_collection: bool,
	properties: Vec<Property>,
	force_id_property: bool,
	route: Option<String>,
	route_options: JsonMap,
	route_params: IndexMap<String, RouteParam>,
	url: Option<String>,
	max_depth: Option<usize>,
}

impl Metadata {
	pub fn new(class: impl Into<String>) -> Self {
		Self {
			class: class.into(),
			collection_name: DEFAULT_METADATA_COLLECTION_NAME.to_string(),
			hydrator: None,
			entity_identifier_name: None,
			route_identifier_name: None,
			entity_route: None,
			is_collection: false,
			properties: Vec::new(),
			force_id_property: true,
			route: None,
			route_options: JsonMap::new(),
			route_params: IndexMap::new(),
			url: None,
			max_depth: None,
		}
	}

	/// Build metadata from an options record.
	///
	/// Keys are matched with underscores removed and case folded, so
	/// `route_name`, `routeName` and `ROUTE_NAME` are equivalent. Legacy
	/// aliases: `route_name` for `route`; `resource_route_name`,
	/// `resource_route` and `entity_route_name` for `entity_route`;
	/// `identifier_name` sets both identifier names unless given explicitly.
	/// `class` is ignored and any other unknown key is rejected.
	///
	/// # Examples
	///
	/// ```
	/// use jsonld_hydra_resource::{HydratorRegistry, Metadata};
	/// use serde_json::json;
	///
	/// let options = json!({
	/// 	"route_name": "user",
	/// 	"identifier_name": "user_id",
	/// 	"max_depth": 2,
	/// });
	/// let metadata = Metadata::from_options(
	/// 	"app::User",
	/// 	options.as_object().unwrap(),
	/// 	&HydratorRegistry::new(),
	/// )
	/// .unwrap();
	///
	/// assert_eq!(metadata.route(), Some("user"));
	/// assert_eq!(metadata.entity_identifier_name(), Some("user_id"));
	/// assert_eq!(metadata.route_identifier_name(), Some("user_id"));
	/// assert_eq!(metadata.max_depth(), Some(2));
	/// ```
	pub fn from_options(class: impl Into<String>, options: &JsonMap, hydrators: &HydratorRegistry) -> Result<Self> {
		let mut metadata = Self::new(class);
		let mut legacy_identifier_name = None;

		for (key, value) in options {
			let normalized: String = key.chars().filter(|c| *c != '_').collect::<String>().to_lowercase();
			match normalized.as_str() {
				"class" => {}
				"collectionname" => metadata.collection_name = expect_string(key, value)?,
				"hydrator" => {
					let name = expect_string(key, value)?;
					metadata.hydrator = Some(hydrators.resolve(&name)?);
				}
				"entityidentifiername" => metadata.entity_identifier_name = optional_string(key, value)?,
				"routeidentifiername" => metadata.route_identifier_name = optional_string(key, value)?,
				"identifiername" => legacy_identifier_name = optional_string(key, value)?,
				"route" | "routename" => metadata.route = optional_string(key, value)?,
				"entityroute" | "entityroutename" | "resourceroute" | "resourceroutename" => {
					metadata.entity_route = optional_string(key, value)?;
				}
				"iscollection" => metadata.is_collection = expect_bool(key, value)?,
				"forceidproperty" => metadata.force_id_property = expect_bool(key, value)?,
				"properties" => {
					let Value::Array(specs) = value else {
						return Err(type_error(key, "an array of property specifications", value));
					};
					metadata.properties = specs.iter().map(Property::factory).collect::<Result<_>>()?;
				}
				"routeoptions" => metadata.route_options = expect_object(key, value)?,
				"routeparams" => {
					metadata.route_params = expect_object(key, value)?
						.into_iter()
						.map(|(name, value)| (name, RouteParam::Literal(value)))
						.collect();
				}
				"url" => metadata.url = optional_string(key, value)?,
				"maxdepth" => {
					metadata.max_depth = match value {
						Value::Null => None,
						other => Some(
							other
								.as_u64()
								.and_then(|depth| usize::try_from(depth).ok())
								.ok_or_else(|| type_error(key, "a non-negative integer", other))?,
						),
					};
				}
				_ => {
					return Err(Error::InvalidArgument(format!(
						"Unhandled option passed to Metadata constructor: {key}"
					)));
				}
			}
		}

		if let Some(name) = legacy_identifier_name {
			if metadata.route_identifier_name.is_none() {
				metadata.route_identifier_name = Some(name.clone());
			}
			if metadata.entity_identifier_name.is_none() {
				metadata.entity_identifier_name = Some(name);
			}
		}

		Ok(metadata)
	}

	pub fn class(&self) -> &str {
		&self.class
	}

	pub fn collection_name(&self) -> &str {
		&self.collection_name
	}

	pub fn hydrator(&self) -> Option<&Arc<dyn Hydrator>> {
		self.hydrator.as_ref()
	}

	pub fn entity_identifier_name(&self) -> Option<&str> {
		self.entity_identifier_name.as_deref()
	}

	pub fn route_identifier_name(&self) -> Option<&str> {
		self.route_identifier_name.as_deref()
	}

	/// Route for members; defaults to the route, then the URL.
	pub fn entity_route(&self) -> Option<&str> {
		self.entity_route
			.as_deref()
			.or(self.route.as_deref())
			.or(self.url.as_deref())
	}

	pub fn is_collection(&self) -> bool {
		self.is_collection
	}

	pub fn properties(&self) -> &[Property] {
		&self.properties
	}

	pub fn force_id_property(&self) -> bool {
		self.force_id_property
	}

	pub fn route(&self) -> Option<&str> {
		self.route.as_deref()
	}

	pub fn has_route(&self) -> bool {
		self.route.is_some()
	}

	pub fn route_options(&self) -> &JsonMap {
		&self.route_options
	}

	pub fn route_params(&self) -> &IndexMap<String, RouteParam> {
		&self.route_params
	}

	pub fn url(&self) -> Option<&str> {
		self.url.as_deref()
	}

	pub fn has_url(&self) -> bool {
		self.url.is_some()
	}

	pub fn max_depth(&self) -> Option<usize> {
		self.max_depth
	}

	pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
		self.collection_name = name.into();
		self
	}

	pub fn with_hydrator(mut self, hydrator: Arc<dyn Hydrator>) -> Self {
		self.hydrator = Some(hydrator);
		self
	}

	pub fn with_entity_identifier_name(mut self, name: impl Into<String>) -> Self {
		self.entity_identifier_name = Some(name.into());
		self
	}

	pub fn with_route_identifier_name(mut self, name: impl Into<String>) -> Self {
		self.route_identifier_name = Some(name.into());
		self
	}

	pub fn with_entity_route(mut self, route: impl Into<String>) -> Self {
		self.entity_route = Some(route.into());
		self
	}

	pub fn with_is_collection(mut self, is_collection: bool) -> Self {
		self.is_collection = is_collection;
		self
	}

	pub fn with_property(mut self, property: Property) -> Self {
		self.properties.push(property);
		self
	}

	pub fn with_force_id_property(mut self, force: bool) -> Self {
		self.force_id_property = force;
		self
	}

	pub fn with_route(mut self, route: impl Into<String>) -> Self {
		self.route = Some(route.into());
		self
	}

	pub fn with_route_options(mut self, options: JsonMap) -> Self {
		self.route_options = options;
		self
	}

	pub fn with_route_param(mut self, name: impl Into<String>, param: impl Into<RouteParam>) -> Self {
		self.route_params.insert(name.into(), param.into());
		self
	}

	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());
		self
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = Some(max_depth);
		self
	}
}

fn type_error(key: &str, expected: &str, value: &Value) -> Error {
	Error::InvalidArgument(format!("Metadata option \"{key}\" expects {expected}; received {value}"))
}

fn expect_string(key: &str, value: &Value) -> Result<String> {
	match value {
		Value::String(text) => Ok(text.clone()),
		other => Err(type_error(key, "a string", other)),
	}
}

fn optional_string(key: &str, value: &Value) -> Result<Option<String>> {
	match value {
		Value::Null => Ok(None),
		other => expect_string(key, other).map(Some),
	}
}

fn expect_bool(key: &str, value: &Value) -> Result<bool> {
	match value {
		Value::Bool(flag) => Ok(*flag),
		other => Err(type_error(key, "a boolean", other)),
	}
}

fn expect_object(key: &str, value: &Value) -> Result<JsonMap> {
	match value {
		Value::Object(map) => Ok(map.clone()),
		other => Err(type_error(key, "an object", other)),
	}
}
