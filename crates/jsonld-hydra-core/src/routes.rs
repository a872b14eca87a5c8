//! In-process URL collaborators.
//!
//! [`RouteTable`] maps route names to path patterns with `{param}`
//! placeholders and understands the `query`, `fragment` and
//! `force_canonical` route options. [`StaticServerUrl`] returns a fixed
//! scheme and host.

use std::collections::HashMap;

use serde_json::Value;
use url::form_urlencoded;

use crate::error::{Error, Result};
use crate::extractor::{ServerUrl, UrlReverser, is_truthy};
use crate::property::JsonMap;

/// Placeholder names of a `{param}` pattern, in order.
fn placeholders(pattern: &str) -> impl Iterator<Item = &str> {
	pattern
		.split('{')
		.skip(1)
		.filter_map(|segment| segment.split_once('}'))
		.map(|(name, _)| name)
		.filter(|name| !name.is_empty())
}

/// Named path patterns used to reverse routes into URLs.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_core::{RouteTable, UrlReverser};
/// use serde_json::json;
///
/// let routes = RouteTable::new().with_route("resource", "/resource/{id}");
/// let params = json!({"id": 1});
/// let options = json!({"query": {"page": 3}});
///
/// let path = routes
/// 	.reverse(
/// 		"resource",
/// 		params.as_object().unwrap(),
/// 		options.as_object().unwrap(),
/// 		true,
/// 	)
/// 	.unwrap();
/// assert_eq!(path, "/resource/1?page=3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
	routes: HashMap<String, String>,
	matched_params: JsonMap,
	canonical_base: Option<String>,
}

impl RouteTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a route by name and path pattern.
	pub fn register(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> &mut Self {
		self.routes.insert(name.into(), pattern.into());
		self
	}

	pub fn with_route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
		self.register(name, pattern);
		self
	}

	/// Params matched for the current request; reused when reversing unless
	/// the caller opts out.
	pub fn with_matched_params(mut self, params: JsonMap) -> Self {
		self.matched_params = params;
		self
	}

	/// Base used when a route is reversed with `force_canonical`.
	pub fn with_canonical_base(mut self, base: impl Into<String>) -> Self {
		self.canonical_base = Some(base.into().trim_end_matches('/').to_string());
		self
	}

	pub fn has_route(&self, name: &str) -> bool {
		self.routes.contains_key(name)
	}

	fn reversal_error(route: &str, message: impl Into<String>) -> Error {
		Error::UrlReversal {
			route: route.to_string(),
			message: message.into(),
		}
	}
}

impl UrlReverser for RouteTable {
	fn reverse(
		&self,
		route: &str,
		params: &JsonMap,
		options: &JsonMap,
		reuse_matched_params: bool,
	) -> Result<String> {
		let pattern = self
			.routes
			.get(route)
			.ok_or_else(|| Self::reversal_error(route, "route not found"))?;

		let mut merged = if reuse_matched_params {
			self.matched_params.clone()
		} else {
			JsonMap::new()
		};
		for (name, value) in params {
			merged.insert(name.clone(), value.clone());
		}

		let missing: Vec<&str> = placeholders(pattern)
			.filter(|name| merged.get(*name).and_then(param_to_string).is_none())
			.collect();
		if !missing.is_empty() {
			return Err(Self::reversal_error(
				route,
				format!("missing params: {}", missing.join(", ")),
			));
		}

		let mut path = String::with_capacity(pattern.len());
		let mut chars = pattern.chars();
		while let Some(ch) = chars.next() {
			if ch != '{' {
				path.push(ch);
				continue;
			}
			let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
			let value = merged
				.get(&name)
				.and_then(param_to_string)
				.ok_or_else(|| Self::reversal_error(route, format!("missing param: {name}")))?;
			if value.contains(['/', '?', '#']) {
				return Err(Self::reversal_error(
					route,
					format!("invalid param '{name}': contains dangerous characters"),
				));
			}
			path.push_str(&value);
		}

		if let Some(Value::Object(query)) = options.get("query") {
			let mut serializer = form_urlencoded::Serializer::new(String::new());
			for (key, value) in query {
				match value {
					Value::Array(items) => {
						let key = format!("{key}[]");
						for item in items.iter().filter_map(param_to_string) {
							serializer.append_pair(&key, &item);
						}
					}
					other => {
						if let Some(text) = param_to_string(other) {
							serializer.append_pair(key, &text);
						}
					}
				}
			}
			let query = serializer.finish();
			if !query.is_empty() {
				path.push('?');
				path.push_str(&query);
			}
		}

		if let Some(Value::String(fragment)) = options.get("fragment") {
			path.push('#');
			path.push_str(fragment);
		}

		if let Some(base) = &self.canonical_base
			&& options.get("force_canonical").is_some_and(is_truthy)
		{
			return Ok(format!("{base}{path}"));
		}

		Ok(path)
	}
}

fn param_to_string(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		_ => None,
	}
}

/// Fixed scheme and host prefix.
#[derive(Debug, Clone)]
pub struct StaticServerUrl {
	base: String,
}

impl StaticServerUrl {
	pub fn new(base: impl Into<String>) -> Self {
		Self {
			base: base.into().trim_end_matches('/').to_string(),
		}
	}
}

impl ServerUrl for StaticServerUrl {
	fn server_url(&self) -> String {
		self.base.clone()
	}
}
