//! Settings Tests
//!
//! Builds renderers from TOML and JSON settings and renders through them.
//!
//! # Test Categories
//!
//! - Loading: settings text and files producing working renderers
//! - Validation: unknown hydrators and bad metadata options

use std::fs;
use std::sync::Arc;

use jsonld_hydra_core::{Result, RouteTable, StaticServerUrl};
use jsonld_hydra_renderer::{JsonLdRenderer, JsonLdSettings, Rendered, SettingsError};
use jsonld_hydra_resource::{DomainObject, Field, HydratorRegistry, ObjectRef, Record};
use rstest::*;
use serde_json::{Value, json};

struct User {
	id: u64,
	email: &'static str,
}

impl DomainObject for User {
	fn type_name(&self) -> &str {
		"app::User"
	}

	fn fields(&self) -> Record {
		Record::from([
			("id".to_string(), Field::from(json!(self.id))),
			("email".to_string(), Field::from(json!(self.email))),
		])
	}
}

fn masking(object: &dyn DomainObject) -> Result<Record> {
	let mut fields = object.fields();
	fields.insert("email".to_string(), Field::from(json!("***")));
	Ok(fields)
}

fn routes() -> RouteTable {
	RouteTable::new().with_route("user", "/users/{id}")
}

fn server() -> StaticServerUrl {
	StaticServerUrl::new("http://localhost.localdomain")
}

#[fixture]
fn hydrators() -> HydratorRegistry {
	HydratorRegistry::new().with("Masking", Arc::new(masking))
}

#[fixture]
fn user() -> ObjectRef {
	Arc::new(User {
		id: 7,
		email: "ada@example.com",
	})
}

fn document(rendered: Rendered) -> Value {
	match rendered {
		Rendered::Document(document) => Value::Object(document),
		Rendered::Problem(problem) => panic!("unexpected problem: {problem}"),
	}
}

// =============================================================================
// Loading Tests
// =============================================================================

#[rstest]
fn test_toml_settings_drive_metadata_and_hydrators(hydrators: HydratorRegistry, user: ObjectRef) {
	let settings = JsonLdSettings::from_toml_str(
		r#"
[renderer.hydrators]
"app::User" = "Masking"

[metadata_map."app::User"]
route_name = "user"
entity_identifier_name = "id"
route_identifier_name = "id"
"#,
	)
	.unwrap();
	let renderer = JsonLdRenderer::from_settings(&settings, hydrators, routes(), server()).unwrap();

	let rendered = document(renderer.render_object(&user).unwrap());

	assert_eq!(rendered["id"], json!("http://localhost.localdomain/users/7"));
	assert_eq!(rendered["email"], json!("***"));
}

#[rstest]
fn test_metadata_hydrator_takes_precedence(hydrators: HydratorRegistry, user: ObjectRef) {
	let settings = JsonLdSettings::from_json_value(json!({
		"renderer": {"default_hydrator": "ObjectProperty"},
		"metadata_map": {
			"app::User": {"hydrator": "Masking", "url": "http://localhost.localdomain/me"}
		}
	}))
	.unwrap();
	let renderer = JsonLdRenderer::from_settings(&settings, hydrators, routes(), server()).unwrap();

	let rendered = document(renderer.render_object(&user).unwrap());

	assert_eq!(rendered["id"], json!("http://localhost.localdomain/me"));
	assert_eq!(rendered["email"], json!("***"));
}

#[rstest]
fn test_render_switches_from_settings(hydrators: HydratorRegistry) {
	let settings = JsonLdSettings::from_toml_str(
		r#"
[renderer]
render_embedded_entities = false
render_collections = false
"#,
	)
	.unwrap();

	let renderer = JsonLdRenderer::from_settings(&settings, hydrators, routes(), server()).unwrap();

	assert!(!renderer.render_embedded_entities());
	assert!(!renderer.render_collections());
}

#[rstest]
fn test_settings_file(hydrators: HydratorRegistry, user: ObjectRef) {
	let path = std::env::temp_dir().join("jsonld-hydra-renderer-settings-test.json");
	fs::write(
		&path,
		json!({
			"metadata_map": {
				"app::User": {"route": "user", "identifier_name": "id"}
			}
		})
		.to_string(),
	)
	.unwrap();

	let renderer = JsonLdRenderer::from_settings_file(&path, hydrators, routes(), server());
	fs::remove_file(&path).unwrap();

	let rendered = document(renderer.unwrap().render_object(&user).unwrap());
	assert_eq!(rendered["id"], json!("http://localhost.localdomain/users/7"));
	assert_eq!(rendered["email"], json!("ada@example.com"));
}

// =============================================================================
// Validation Tests
// =============================================================================

#[rstest]
#[case(json!({"renderer": {"default_hydrator": "Missing"}}))]
#[case(json!({"renderer": {"hydrators": {"app::User": "Missing"}}}))]
#[case(json!({"metadata_map": {"app::User": {"hydrator": "Missing"}}}))]
fn test_unknown_hydrator_is_invalid(hydrators: HydratorRegistry, #[case] raw: Value) {
	let settings = JsonLdSettings::from_json_value(raw).unwrap();

	let result = JsonLdRenderer::from_settings(&settings, hydrators, routes(), server());

	assert!(matches!(result, Err(SettingsError::Invalid(_))));
}

#[rstest]
fn test_wrongly_typed_metadata_option(hydrators: HydratorRegistry) {
	let settings = JsonLdSettings::from_json_value(json!({
		"metadata_map": {"app::User": {"max_depth": "deep"}}
	}))
	.unwrap();

	let result = JsonLdRenderer::from_settings(&settings, hydrators, routes(), server());

	assert!(matches!(result, Err(SettingsError::Invalid(_))));
}
