//! Metadata Resource Tests
//!
//! Converts configured domain objects into resources and resolves their
//! relations through the core extractors.
//!
//! # Test Categories
//!
//! - Configuration: metadata maps built from option maps
//! - Conversion: entities and collections produced by the factory
//! - Pagination: injected links resolved to absolute URLs

use std::sync::Arc;

use assert_json_diff::assert_json_eq;
use indexmap::IndexMap;
use jsonld_hydra_core::{
	JsonMap, PropertyCollectionExtractor, PropertyExtractor, RouteTable, StaticServerUrl,
};
use jsonld_hydra_resource::{
	Collection, DomainObject, EntityExtractor, EntityHydratorManager, Field, HydratorRegistry,
	InjectPagination, MetadataMap, ObjectRef, PaginationInjector, PaginationStatus, Paginator,
	Record, Resource, ResourceFactory,
};
use rstest::*;
use serde_json::{Value, json};

// =============================================================================
// Fixtures
// =============================================================================

struct Article {
	slug: &'static str,
}

impl DomainObject for Article {
	fn type_name(&self) -> &str {
		"blog::Article"
	}

	fn ancestors(&self) -> &[&'static str] {
		&["blog::Publishable"]
	}

	fn fields(&self) -> Record {
		Record::from([("slug".to_string(), Field::from(json!(self.slug)))])
	}
}

struct Archive;

impl DomainObject for Archive {
	fn type_name(&self) -> &str {
		"blog::Archive"
	}

	fn fields(&self) -> Record {
		Record::new()
	}

	fn members(&self) -> Option<Vec<Field>> {
		Some(vec![
			Field::object(Article { slug: "first" }),
			Field::object(Article { slug: "second" }),
		])
	}
}

fn options(value: Value) -> JsonMap {
	value.as_object().cloned().unwrap()
}

#[fixture]
fn metadata_map() -> Arc<MetadataMap> {
	let mut config = IndexMap::new();
	config.insert(
		"blog::Publishable".to_string(),
		options(json!({
			"route": "article",
			"identifier_name": "slug",
			"properties": [{"key": "author", "url": "http://blog.example/authors/1"}]
		})),
	);
	config.insert(
		"blog::Archive".to_string(),
		options(json!({
			"is_collection": true,
			"collection_name": "articles",
			"route": "archive",
			"entity_route": "article"
		})),
	);
	Arc::new(MetadataMap::from_config(&config, &HydratorRegistry::new()).unwrap())
}

#[fixture]
fn factory(metadata_map: Arc<MetadataMap>) -> ResourceFactory {
	let manager = EntityHydratorManager::new(HydratorRegistry::new(), metadata_map);
	ResourceFactory::new(Arc::new(EntityExtractor::new(Arc::new(manager))))
}

#[fixture]
fn links() -> PropertyCollectionExtractor {
	let routes = RouteTable::new()
		.with_route("article", "/articles/{slug}")
		.with_route("archive", "/articles");
	PropertyCollectionExtractor::new(Arc::new(PropertyExtractor::new(
		Arc::new(routes),
		Arc::new(StaticServerUrl::new("http://blog.example")),
	)))
}

// =============================================================================
// Conversion Tests
// =============================================================================

#[rstest]
fn test_ancestor_metadata_builds_entity_links(
	metadata_map: Arc<MetadataMap>,
	factory: ResourceFactory,
	links: PropertyCollectionExtractor,
) {
	let article: ObjectRef = Arc::new(Article { slug: "hello" });
	let metadata = metadata_map.get(article.as_ref()).unwrap();

	let Resource::Entity(entity) = factory.create_entity_from_metadata(&article, metadata, true).unwrap() else {
		panic!("expected an entity");
	};

	assert_eq!(entity.id(), Some(&json!("hello")));
	assert_json_eq!(
		Value::Object(links.extract(entity.properties()).unwrap()),
		json!({
			"author": "http://blog.example/authors/1",
			"id": "http://blog.example/articles/hello",
		})
	);
}

#[rstest]
fn test_collection_metadata_builds_collection(metadata_map: Arc<MetadataMap>, factory: ResourceFactory) {
	let archive: ObjectRef = Arc::new(Archive);
	let metadata = metadata_map.get(archive.as_ref()).unwrap();

	let Resource::Collection(collection) = factory.create_entity_from_metadata(&archive, metadata, true).unwrap()
	else {
		panic!("expected a collection");
	};

	assert_eq!(collection.collection_name(), "articles");
	assert_eq!(collection.collection_route(), Some("archive"));
	assert_eq!(collection.entity_route(), Some("article"));
	assert_eq!(collection.count(), Some(2));
	assert!(collection.properties().has("id"));
}

// =============================================================================
// Pagination Tests
// =============================================================================

#[rstest]
#[case(1, json!({
	"id": "http://blog.example/articles?page=1",
	"firstPage": "http://blog.example/articles",
	"lastPage": "http://blog.example/articles?page=3",
	"nextPage": "http://blog.example/articles?page=2",
}))]
#[case(3, json!({
	"id": "http://blog.example/articles?page=3",
	"firstPage": "http://blog.example/articles",
	"lastPage": "http://blog.example/articles?page=3",
	"previousPage": "http://blog.example/articles?page=2",
}))]
fn test_injected_view_resolves_to_absolute_urls(
	links: PropertyCollectionExtractor,
	#[case] page: i64,
	#[case] expected_view: Value,
) {
	let items = (1..=25).map(|id| Field::from(json!({"id": id}))).collect();
	let mut collection = Collection::from_paginator(Paginator::from_items(items));
	collection.set_collection_route("archive").set_page_size(10).unwrap();
	collection.set_page(page).unwrap();

	let status = PaginationInjector.inject_pagination_properties(&mut collection).unwrap();
	let extracted = links.extract(collection.properties()).unwrap();

	assert_eq!(status, PaginationStatus::Applied);
	assert_eq!(extracted["id"], json!("http://blog.example/articles"));
	assert_json_eq!(extracted["view"], expected_view);
	assert_eq!(collection.members().unwrap().len(), if page == 3 { 5 } else { 10 });
}
