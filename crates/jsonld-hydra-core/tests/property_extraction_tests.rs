//! Property extraction tests
//!
//! Covers PropertyExtractor and PropertyCollectionExtractor against the
//! in-process RouteTable:
//! - Literal, URL and route-based properties
//! - Repeated keywords and single-valued `id`
//! - Nested collections and malformed aggregates

use std::sync::Arc;

use assert_json_diff::assert_json_eq;
use jsonld_hydra_core::{
	Error, ExtractProperty, Property, PropertyCollection, PropertyCollectionExtractor,
	PropertyExtractor, PropertySlot, RouteSpec, RouteTable, StaticServerUrl,
};
use rstest::*;
use serde_json::{Value, json};

#[fixture]
fn extractor() -> Arc<PropertyExtractor> {
	let routes = RouteTable::new()
		.with_route("resource", "/resource")
		.with_route("resource/item", "/resource/{id}");
	Arc::new(PropertyExtractor::new(
		Arc::new(routes),
		Arc::new(StaticServerUrl::new("http://localhost.localdomain")),
	))
}

#[fixture]
fn collection_extractor(extractor: Arc<PropertyExtractor>) -> PropertyCollectionExtractor {
	PropertyCollectionExtractor::new(extractor)
}

fn route(name: &str, params: Value) -> RouteSpec {
	RouteSpec::new(name).with_params(params.as_object().cloned().unwrap_or_default())
}

// ============================================================================
// PropertyExtractor
// ============================================================================

#[rstest]
fn test_url_spec_extracts_to_same_url(extractor: Arc<PropertyExtractor>) {
	let property = Property::factory(&json!({"key": "x", "url": "http://e/x"})).unwrap();

	assert_eq!(extractor.extract(&property).unwrap(), json!("http://e/x"));
}

#[rstest]
fn test_route_spec_extracts_to_absolute_url(extractor: Arc<PropertyExtractor>) {
	let property = Property::factory(&json!({
		"key": "id",
		"route": {"name": "resource/item", "params": {"id": 7}},
	}))
	.unwrap();

	assert_eq!(
		extractor.extract(&property).unwrap(),
		json!("http://localhost.localdomain/resource/7")
	);
}

#[rstest]
fn test_unknown_route_surfaces_reversal_error(extractor: Arc<PropertyExtractor>) {
	let property = Property::new("id").with_route(RouteSpec::new("nope")).unwrap();

	let result = extractor.extract(&property);

	assert!(matches!(result, Err(Error::UrlReversal { route, .. }) if route == "nope"));
}

// ============================================================================
// PropertyCollectionExtractor
// ============================================================================

#[rstest]
fn test_collection_extracts_in_insertion_order(collection_extractor: PropertyCollectionExtractor) {
	let mut properties = PropertyCollection::new();
	properties.add(Property::new("id").with_route(route("resource/item", json!({"id": 1}))).unwrap(), false);
	properties.add(Property::new("name").with_value(json!("foo")).unwrap(), false);
	properties.add(Property::new("describedBy").with_url("http://e/doc").unwrap(), false);

	let extracted = collection_extractor.extract(&properties).unwrap();

	assert_json_eq!(
		Value::Object(extracted.clone()),
		json!({
			"id": "http://localhost.localdomain/resource/1",
			"name": "foo",
			"describedBy": "http://e/doc",
		})
	);
	let keys: Vec<_> = extracted.keys().cloned().collect();
	assert_eq!(keys, vec!["id", "name", "describedBy"]);
}

#[rstest]
fn test_repeated_keyword_extracts_to_list(collection_extractor: PropertyCollectionExtractor) {
	let mut properties = PropertyCollection::new();
	properties.add(Property::new("tag").with_url("http://e/a").unwrap(), false);
	properties.add(Property::new("tag").with_url("http://e/b").unwrap(), false);

	let extracted = collection_extractor.extract(&properties).unwrap();

	assert_eq!(extracted["tag"], json!(["http://e/a", "http://e/b"]));
}

#[rstest]
fn test_id_added_twice_extracts_last(collection_extractor: PropertyCollectionExtractor) {
	let mut properties = PropertyCollection::new();
	properties.add(Property::new("id").with_url("http://e/1").unwrap(), false);
	properties.add(Property::new("id").with_url("http://e/2").unwrap(), false);

	let extracted = collection_extractor.extract(&properties).unwrap();

	assert_eq!(extracted["id"], json!("http://e/2"));
}

#[rstest]
fn test_nested_collection_extracts_recursively(collection_extractor: PropertyCollectionExtractor) {
	let mut view = PropertyCollection::new();
	view.add(Property::new("first").with_url("http://e/?page=1").unwrap(), false);
	let mut properties = PropertyCollection::new();
	properties.add_nested("view", view, false);

	let extracted = collection_extractor.extract(&properties).unwrap();

	assert_json_eq!(extracted["view"], json!({"first": "http://e/?page=1"}));
}

#[rstest]
fn test_aggregate_with_nested_collection_is_malformed(collection_extractor: PropertyCollectionExtractor) {
	let mut properties = PropertyCollection::new();
	properties.add(Property::new("view").with_url("http://e/v").unwrap(), false);
	properties.add_nested("view", PropertyCollection::new(), false);
	assert!(matches!(properties.get("view"), Some(PropertySlot::Many(_))));

	let result = collection_extractor.extract(&properties);

	assert!(matches!(result, Err(Error::Domain(message)) if message.contains("\"view\"")));
}

#[rstest]
fn test_incomplete_property_in_collection_fails(collection_extractor: PropertyCollectionExtractor) {
	let mut properties = PropertyCollection::new();
	properties.add(Property::new("broken"), false);

	assert!(matches!(collection_extractor.extract(&properties), Err(Error::Domain(_))));
}
