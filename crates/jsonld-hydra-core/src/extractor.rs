//! Resolution of properties into their final JSON values.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::property::{JsonMap, Property, PropertyTarget, PropertyValue};
use crate::property_collection::{PropertyCollection, PropertySlot};

/// Route option controlling whether params matched for the current request
/// are reused when building a URL.
pub const REUSE_MATCHED_PARAMS: &str = "reuse_matched_params";

/// Builds a path (or absolute URL) from a route name.
pub trait UrlReverser: Send + Sync {
	/// Returns a root-relative path or an absolute URL.
	fn reverse(&self, route: &str, params: &JsonMap, options: &JsonMap, reuse_matched_params: bool)
	-> Result<String>;
}

impl<F> UrlReverser for F
where
	F: Fn(&str, &JsonMap, &JsonMap, bool) -> Result<String> + Send + Sync,
{
	fn reverse(
		&self,
		route: &str,
		params: &JsonMap,
		options: &JsonMap,
		reuse_matched_params: bool,
	) -> Result<String> {
		self(route, params, options, reuse_matched_params)
	}
}

/// Supplies the scheme and host prefix for relative paths.
pub trait ServerUrl: Send + Sync {
	fn server_url(&self) -> String;
}

impl<F> ServerUrl for F
where
	F: Fn() -> String + Send + Sync,
{
	fn server_url(&self) -> String {
		self()
	}
}

/// Anything able to turn one property into a JSON value.
pub trait ExtractProperty: Send + Sync {
	fn extract(&self, property: &Property) -> Result<Value>;
}

/// Resolves a property: values pass through, URLs are returned unchanged and
/// routes are reversed and made absolute.
///
/// The server URL is requested once and cached for the life of the extractor.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use jsonld_hydra_core::{ExtractProperty, Property, PropertyExtractor, RouteTable, StaticServerUrl};
///
/// let routes = RouteTable::new().with_route("user", "/users/{id}");
/// let extractor = PropertyExtractor::new(
/// 	Arc::new(routes),
/// 	Arc::new(StaticServerUrl::new("http://localhost.localdomain")),
/// );
///
/// let mut property = Property::new("id");
/// let params = serde_json::json!({"id": 42});
/// property
/// 	.set_route("user", params.as_object().cloned(), None)
/// 	.unwrap();
///
/// assert_eq!(
/// 	extractor.extract(&property).unwrap(),
/// 	"http://localhost.localdomain/users/42"
/// );
/// ```
pub struct PropertyExtractor {
	url_reverser: Arc<dyn UrlReverser>,
	server_url: Arc<dyn ServerUrl>,
	server_url_cache: OnceCell<String>,
}

impl PropertyExtractor {
	pub fn new(url_reverser: Arc<dyn UrlReverser>, server_url: Arc<dyn ServerUrl>) -> Self {
		Self {
			url_reverser,
			server_url,
			server_url_cache: OnceCell::new(),
		}
	}

	pub fn url_reverser(&self) -> &Arc<dyn UrlReverser> {
		&self.url_reverser
	}

	fn server_url(&self) -> &str {
		self.server_url_cache.get_or_init(|| self.server_url.server_url())
	}
}

impl ExtractProperty for PropertyExtractor {
	fn extract(&self, property: &Property) -> Result<Value> {
		let Some(target) = property.target() else {
			return Err(Error::Domain(format!(
				"property \"{}\" was incomplete; must contain a URL or a route",
				property.keyword()
			)));
		};

		let route = match target {
			PropertyTarget::Value(PropertyValue::Json(value)) => return Ok(value.clone()),
			PropertyTarget::Value(PropertyValue::Properties(nested)) => {
				return extract_properties(self, nested).map(Value::Object);
			}
			PropertyTarget::Url(url) => return Ok(Value::String(url.clone())),
			PropertyTarget::Route(route) => route,
		};

		let mut options = route.options().clone();
		let reuse_matched_params = options
			.shift_remove(REUSE_MATCHED_PARAMS)
			.is_none_or(|flag| is_truthy(&flag));

		let path = self
			.url_reverser
			.reverse(route.name(), route.params(), &options, reuse_matched_params)?;

		if path.starts_with("http") {
			return Ok(Value::String(path));
		}
		Ok(Value::String(format!("{}{}", self.server_url(), path)))
	}
}

/// Maps a [`PropertyCollection`] to a JSON object keyed by keyword.
#[derive(Clone)]
pub struct PropertyCollectionExtractor {
	property_extractor: Arc<dyn ExtractProperty>,
}

impl PropertyCollectionExtractor {
	pub fn new(property_extractor: Arc<dyn ExtractProperty>) -> Self {
		Self { property_extractor }
	}

	pub fn property_extractor(&self) -> &Arc<dyn ExtractProperty> {
		&self.property_extractor
	}

	pub fn extract(&self, collection: &PropertyCollection) -> Result<Map<String, Value>> {
		extract_properties(self.property_extractor.as_ref(), collection)
	}
}

/// Extract every slot of `collection` with `extractor`.
///
/// Lists must contain plain properties only; a list of fewer than two
/// entries collapses to its single value.
pub fn extract_properties<E: ExtractProperty + ?Sized>(
	extractor: &E,
	collection: &PropertyCollection,
) -> Result<Map<String, Value>> {
	let mut extracted = Map::new();
	for (keyword, slot) in collection {
		let value = match slot {
			PropertySlot::Single(property) => extractor.extract(property)?,
			PropertySlot::Nested(nested) => Value::Object(extract_properties(extractor, nested)?),
			PropertySlot::Many(slots) => {
				let mut aggregate = Vec::with_capacity(slots.len());
				for entry in slots {
					let PropertySlot::Single(property) = entry else {
						return Err(Error::Domain(format!(
							"Property object aggregated for keyword \"{keyword}\" in resource was malformed; cannot generate property"
						)));
					};
					aggregate.push(extractor.extract(property)?);
				}
				if aggregate.len() < 2 {
					aggregate.pop().unwrap_or(Value::Null)
				} else {
					Value::Array(aggregate)
				}
			}
		};
		extracted.insert(keyword.clone(), value);
	}
	Ok(extracted)
}

/// Loose truthiness used for boolean-ish route options.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
		Value::String(text) => !text.is_empty() && text != "0",
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
	}
}
