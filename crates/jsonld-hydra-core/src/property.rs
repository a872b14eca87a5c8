//! Relations attached to rendered resources.
//!
//! A [`Property`] names a relation (`id`, `author`, `next`, ...) and points
//! at exactly one target: a literal value, an absolute URL, or a route that is
//! turned into a URL when the resource is rendered.

use serde_json::{Map, Value};
use url::Url;

use crate::error::{Error, Result};
use crate::property_collection::PropertyCollection;

/// Insertion-ordered JSON object used for route params and options.
pub type JsonMap = Map<String, Value>;

/// Deferred URL: a route name plus the params and options passed to the
/// URL reverser.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteSpec {
	name: String,
	params: JsonMap,
	options: JsonMap,
}

impl RouteSpec {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			params: JsonMap::new(),
			options: JsonMap::new(),
		}
	}

	pub fn with_params(mut self, params: JsonMap) -> Self {
		self.params = params;
		self
	}

	pub fn with_options(mut self, options: JsonMap) -> Self {
		self.options = options;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn params(&self) -> &JsonMap {
		&self.params
	}

	pub fn params_mut(&mut self) -> &mut JsonMap {
		&mut self.params
	}

	pub fn options(&self) -> &JsonMap {
		&self.options
	}

	pub fn options_mut(&mut self) -> &mut JsonMap {
		&mut self.options
	}
}

/// Literal value of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
	Json(Value),
	/// Nested relations, extracted recursively.
	Properties(PropertyCollection),
}

impl From<Value> for PropertyValue {
	fn from(value: Value) -> Self {
		PropertyValue::Json(value)
	}
}

impl From<PropertyCollection> for PropertyValue {
	fn from(properties: PropertyCollection) -> Self {
		PropertyValue::Properties(properties)
	}
}

/// What a property resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyTarget {
	Value(PropertyValue),
	Url(String),
	Route(RouteSpec),
}

impl PropertyTarget {
	fn describe(&self) -> &'static str {
		match self {
			PropertyTarget::Value(_) => "value",
			PropertyTarget::Url(_) => "URL",
			PropertyTarget::Route(_) => "route",
		}
	}
}

/// A single named relation.
///
/// At most one of value, URL or route may be set. Replacing a target with
/// one of the same kind is allowed; switching kinds is a [`Error::Domain`].
///
/// # Examples
///
/// ```
/// use jsonld_hydra_core::Property;
///
/// let mut property = Property::new("self");
/// property.set_route("user", None, None).unwrap();
/// assert!(property.is_complete());
/// assert!(property.set_url("http://example.com/users/1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
	keyword: String,
	target: Option<PropertyTarget>,
}

impl Property {
	pub fn new(keyword: impl Into<String>) -> Self {
		Self {
			keyword: keyword.into(),
			target: None,
		}
	}

	/// Build a property from a declarative record.
	///
	/// The record must contain `key` and may contain one of `value`, `url` or
	/// `route`. A route is either a route name or an object with `name` and
	/// optional `params` and `options` objects. Null entries count as absent;
	/// a record without any target yields an incomplete property.
	///
	/// # Examples
	///
	/// ```
	/// use jsonld_hydra_core::Property;
	/// use serde_json::json;
	///
	/// let property = Property::factory(&json!({
	/// 	"key": "author",
	/// 	"route": {"name": "user", "params": {"id": 7}},
	/// }))
	/// .unwrap();
	///
	/// assert_eq!(property.keyword(), "author");
	/// assert_eq!(property.route().unwrap().name(), "user");
	/// ```
	pub fn factory(spec: &Value) -> Result<Self> {
		let Value::Object(spec) = spec else {
			return Err(Error::InvalidArgument(format!(
				"property specification must be an object; received {}",
				json_type_name(spec)
			)));
		};

		let keyword = match spec.get("key") {
			Some(Value::String(key)) => key.clone(),
			Some(Value::Number(key)) => key.to_string(),
			_ => {
				return Err(Error::InvalidArgument(
					"property specification must contain a \"key\" element; none found".to_string(),
				));
			}
		};
		let mut property = Property::new(keyword);

		if let Some(value) = present(spec, "value") {
			property.set_value(value.clone())?;
			return Ok(property);
		}

		if let Some(url) = present(spec, "url") {
			let Value::String(url) = url else {
				return Err(Error::InvalidArgument(format!(
					"property specification \"url\" must be a string; received {}",
					json_type_name(url)
				)));
			};
			property.set_url(url.clone())?;
			return Ok(property);
		}

		if let Some(route) = present(spec, "route") {
			match route {
				Value::String(name) => {
					property.set_route(name.clone(), None, None)?;
				}
				Value::Object(route) => {
					let Some(Value::String(name)) = route.get("name") else {
						return Err(Error::InvalidArgument(
							"property specification \"route\" must contain a \"name\" element; none found"
								.to_string(),
						));
					};
					let params = route.get("params").and_then(Value::as_object).cloned();
					let options = route.get("options").and_then(Value::as_object).cloned();
					property.set_route(name.clone(), params, options)?;
				}
				other => {
					return Err(Error::InvalidArgument(format!(
						"property specification \"route\" must be a string or object; received {}",
						json_type_name(other)
					)));
				}
			}
		}

		Ok(property)
	}

	pub fn keyword(&self) -> &str {
		&self.keyword
	}

	/// Set a literal value. `null` is rejected.
	pub fn set_value(&mut self, value: impl Into<PropertyValue>) -> Result<&mut Self> {
		let value = value.into();
		if matches!(value, PropertyValue::Json(Value::Null)) {
			return Err(Error::InvalidArgument(format!(
				"property \"{}\" expects an array, a scalar or a property collection; received null",
				self.keyword
			)));
		}
		self.ensure_unset("value", |target| matches!(target, PropertyTarget::Value(_)))?;
		self.target = Some(PropertyTarget::Value(value));
		Ok(self)
	}

	/// Set an absolute or root-relative URL.
	pub fn set_url(&mut self, url: impl Into<String>) -> Result<&mut Self> {
		let url = url.into();
		self.ensure_unset("URL", |target| matches!(target, PropertyTarget::Url(_)))?;
		validate_url(&url)?;
		self.target = Some(PropertyTarget::Url(url));
		Ok(self)
	}

	/// Point the property at a route. Absent params and options default to
	/// empty objects.
	pub fn set_route(
		&mut self,
		name: impl Into<String>,
		params: Option<JsonMap>,
		options: Option<JsonMap>,
	) -> Result<&mut Self> {
		self.ensure_unset("route", |target| matches!(target, PropertyTarget::Route(_)))?;
		let route = RouteSpec::new(name)
			.with_params(params.unwrap_or_default())
			.with_options(options.unwrap_or_default());
		self.target = Some(PropertyTarget::Route(route));
		Ok(self)
	}

	pub fn with_value(mut self, value: impl Into<PropertyValue>) -> Result<Self> {
		self.set_value(value)?;
		Ok(self)
	}

	pub fn with_url(mut self, url: impl Into<String>) -> Result<Self> {
		self.set_url(url)?;
		Ok(self)
	}

	pub fn with_route(mut self, route: RouteSpec) -> Result<Self> {
		self.ensure_unset("route", |target| matches!(target, PropertyTarget::Route(_)))?;
		self.target = Some(PropertyTarget::Route(route));
		Ok(self)
	}

	pub fn target(&self) -> Option<&PropertyTarget> {
		self.target.as_ref()
	}

	pub fn value(&self) -> Option<&PropertyValue> {
		match &self.target {
			Some(PropertyTarget::Value(value)) => Some(value),
			_ => None,
		}
	}

	pub fn url(&self) -> Option<&str> {
		match &self.target {
			Some(PropertyTarget::Url(url)) => Some(url.as_str()),
			_ => None,
		}
	}

	pub fn route(&self) -> Option<&RouteSpec> {
		match &self.target {
			Some(PropertyTarget::Route(route)) => Some(route),
			_ => None,
		}
	}

	pub fn route_mut(&mut self) -> Option<&mut RouteSpec> {
		match &mut self.target {
			Some(PropertyTarget::Route(route)) => Some(route),
			_ => None,
		}
	}

	pub fn has_value(&self) -> bool {
		self.value().is_some()
	}

	pub fn has_url(&self) -> bool {
		self.url().is_some()
	}

	pub fn has_route(&self) -> bool {
		self.route().is_some()
	}

	/// Whether a value, URL or route has been set.
	pub fn is_complete(&self) -> bool {
		self.target.is_some()
	}

	fn ensure_unset(&self, setting: &str, same_kind: impl Fn(&PropertyTarget) -> bool) -> Result<()> {
		match &self.target {
			Some(target) if !same_kind(target) => Err(Error::Domain(format!(
				"property \"{}\" already has a {} set; cannot set {}",
				self.keyword,
				target.describe(),
				setting
			))),
			_ => Ok(()),
		}
	}
}

fn present<'a>(spec: &'a JsonMap, key: &str) -> Option<&'a Value> {
	spec.get(key).filter(|value| !value.is_null())
}

fn validate_url(candidate: &str) -> Result<()> {
	if candidate.is_empty() || candidate.chars().any(|c| c.is_whitespace() || c.is_control()) {
		return Err(Error::InvalidArgument(format!("Received invalid URL: {candidate:?}")));
	}
	if Url::parse(candidate).is_ok() {
		return Ok(());
	}
	// Relative references are resolved against a placeholder base.
	Url::parse("http://localhost/")
		.and_then(|base| base.join(candidate))
		.map(|_| ())
		.map_err(|e| Error::InvalidArgument(format!("Received invalid URL: {e}")))
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_new_property_is_incomplete() {
		let property = Property::new("id");
		assert_eq!(property.keyword(), "id");
		assert!(!property.is_complete());
	}

	#[rstest]
	fn test_switching_target_kind_is_domain_error() {
		let mut property = Property::new("id");
		property.set_url("http://example.com/foo").unwrap();

		let result = property.set_route("foo", None, None);
		assert!(matches!(result, Err(Error::Domain(message)) if message.contains("already has a URL set")));

		let result = property.set_value(json!("bar"));
		assert!(matches!(result, Err(Error::Domain(_))));
	}

	#[rstest]
	fn test_same_kind_may_be_replaced() {
		let mut property = Property::new("id");
		property.set_route("first", None, None).unwrap();
		property.set_route("second", None, None).unwrap();

		assert_eq!(property.route().unwrap().name(), "second");
	}

	#[rstest]
	fn test_null_value_rejected() {
		let mut property = Property::new("name");
		assert!(matches!(
			property.set_value(json!(null)),
			Err(Error::InvalidArgument(_))
		));
		assert!(!property.is_complete());
	}

	#[rstest]
	#[case("http://example.com/foo")]
	#[case("/api/users/1")]
	#[case("users?page=2")]
	fn test_valid_urls_accepted(#[case] url: &str) {
		let mut property = Property::new("id");
		assert!(property.set_url(url).is_ok());
		assert_eq!(property.url(), Some(url));
	}

	#[rstest]
	#[case("")]
	#[case("http://exa mple.com")]
	fn test_invalid_urls_rejected(#[case] url: &str) {
		let mut property = Property::new("id");
		assert!(matches!(property.set_url(url), Err(Error::InvalidArgument(_))));
	}

	#[rstest]
	fn test_factory_requires_key() {
		let result = Property::factory(&json!({"url": "http://example.com"}));
		assert!(matches!(result, Err(Error::InvalidArgument(message)) if message.contains("\"key\"")));
	}

	#[rstest]
	fn test_factory_route_object_requires_name() {
		let result = Property::factory(&json!({"key": "foo", "route": {"params": {"id": 1}}}));
		assert!(matches!(result, Err(Error::InvalidArgument(_))));
	}

	#[rstest]
	fn test_factory_rejects_non_string_route() {
		let result = Property::factory(&json!({"key": "foo", "route": 42}));
		assert!(matches!(result, Err(Error::InvalidArgument(_))));
	}

	#[rstest]
	fn test_factory_value_wins_over_other_targets() {
		let property = Property::factory(&json!({
			"key": "describedBy",
			"value": "http://example.com/doc",
			"url": "http://example.com/ignored",
		}))
		.unwrap();

		assert_eq!(
			property.value(),
			Some(&PropertyValue::Json(json!("http://example.com/doc")))
		);
	}

	#[rstest]
	fn test_factory_without_target_yields_incomplete_property() {
		let property = Property::factory(&json!({"key": "orphan"})).unwrap();
		assert!(!property.is_complete());
	}
}
