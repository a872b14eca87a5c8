//! Renderer configuration.
//!
//! Settings come from TOML or JSON documents with two sections:
//!
//! ```toml
//! [renderer]
//! default_hydrator = "ObjectProperty"
//! render_embedded_entities = true
//! render_collections = true
//!
//! [renderer.hydrators]
//! "app::User" = "ObjectProperty"
//!
//! [metadata_map."app::User"]
//! route_name = "user"
//! entity_identifier_name = "id"
//! max_depth = 2
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use jsonld_hydra_core::JsonMap;
use jsonld_hydra_resource::{HydratorRegistry, MetadataMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Error type for loading settings.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Unsupported settings format: {0}")]
	UnsupportedFormat(String),

	#[error("Invalid settings: {0}")]
	Invalid(#[from] jsonld_hydra_core::Error),
}

/// Renderer switches and hydrator selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
	/// Registered hydrator used when neither metadata nor the per-type map
	/// names one.
	pub default_hydrator: Option<String>,
	/// Type name to registered hydrator name.
	pub hydrators: IndexMap<String, String>,
	/// Render the payload of embedded metadata-described objects; when off
	/// they render as relations only.
	#[serde(alias = "render_member_entities")]
	pub render_embedded_entities: bool,
	/// Render the payload of collection members that are entities.
	#[serde(alias = "render_member_collections")]
	pub render_collections: bool,
}

impl Default for RendererOptions {
	fn default() -> Self {
		Self {
			default_hydrator: None,
			hydrators: IndexMap::new(),
			render_embedded_entities: true,
			render_collections: true,
		}
	}
}

/// Complete configuration for building a renderer.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_renderer::JsonLdSettings;
///
/// let settings = JsonLdSettings::from_toml_str(
/// 	r#"
/// [renderer]
/// render_collections = false
///
/// [metadata_map."app::User"]
/// route_name = "user"
/// "#,
/// )
/// .unwrap();
///
/// assert!(!settings.renderer.render_collections);
/// assert!(settings.renderer.render_embedded_entities);
/// assert!(settings.metadata_map.contains_key("app::User"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonLdSettings {
	pub renderer: RendererOptions,
	/// Type name to metadata options.
	pub metadata_map: IndexMap<String, JsonMap>,
}

impl JsonLdSettings {
	pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(content)?)
	}

	pub fn from_json_str(content: &str) -> Result<Self, SettingsError> {
		Ok(serde_json::from_str(content)?)
	}

	pub fn from_json_value(value: Value) -> Result<Self, SettingsError> {
		Ok(serde_json::from_value(value)?)
	}

	/// Load a `.toml` or `.json` file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let content = fs::read_to_string(path)?;
		let settings = match path.extension().and_then(|extension| extension.to_str()) {
			Some("toml") => Self::from_toml_str(&content)?,
			Some("json") => Self::from_json_str(&content)?,
			other => {
				return Err(SettingsError::UnsupportedFormat(
					other.unwrap_or_default().to_string(),
				));
			}
		};
		debug!(path = %path.display(), classes = settings.metadata_map.len(), "settings loaded");
		Ok(settings)
	}

	/// Metadata map described by the `metadata_map` section.
	pub fn build_metadata_map(&self, hydrators: &HydratorRegistry) -> Result<MetadataMap, SettingsError> {
		Ok(MetadataMap::from_config(&self.metadata_map, hydrators)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_defaults_when_sections_missing() {
		let settings = JsonLdSettings::from_toml_str("").unwrap();

		assert_eq!(settings.renderer, RendererOptions::default());
		assert!(settings.metadata_map.is_empty());
	}

	#[rstest]
	fn test_legacy_flag_names_accepted() {
		let settings = JsonLdSettings::from_json_value(json!({
			"renderer": {"render_member_entities": false}
		}))
		.unwrap();

		assert!(!settings.renderer.render_embedded_entities);
	}

	#[rstest]
	fn test_malformed_toml_is_toml_error() {
		let result = JsonLdSettings::from_toml_str("[renderer\nrender_collections = 1");
		assert!(matches!(result, Err(SettingsError::Toml(_))));
	}

	#[rstest]
	fn test_unsupported_extension() {
		let path = std::env::temp_dir().join("jsonld-hydra-settings-test.yaml");
		fs::write(&path, "renderer: {}").unwrap();

		let result = JsonLdSettings::from_file(&path);
		fs::remove_file(&path).unwrap();

		assert!(matches!(result, Err(SettingsError::UnsupportedFormat(extension)) if extension == "yaml"));
	}

	#[rstest]
	fn test_invalid_metadata_options() {
		let settings = JsonLdSettings::from_json_value(json!({
			"metadata_map": {"app::User": {"no_such_option": 1}}
		}))
		.unwrap();

		let result = settings.build_metadata_map(&HydratorRegistry::new());

		assert!(matches!(result, Err(SettingsError::Invalid(_))));
	}
}
