//! # jsonld-hydra-core
//!
//! Building blocks shared by the JSON-LD/Hydra renderer: the property model,
//! the extractors that resolve properties into JSON values, error and
//! problem types, document merging and simple URL collaborators.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use jsonld_hydra_core::{
//! 	Property, PropertyCollection, PropertyCollectionExtractor, PropertyExtractor, RouteTable,
//! 	StaticServerUrl,
//! };
//! use serde_json::json;
//!
//! let extractor = Arc::new(PropertyExtractor::new(
//! 	Arc::new(RouteTable::new().with_route("users", "/users")),
//! 	Arc::new(StaticServerUrl::new("http://localhost")),
//! ));
//! let collection_extractor = PropertyCollectionExtractor::new(extractor);
//!
//! let mut properties = PropertyCollection::new();
//! let mut id = Property::new("id");
//! id.set_route("users", None, None).unwrap();
//! properties.add(id, false);
//!
//! let rendered = collection_extractor.extract(&properties).unwrap();
//! assert_eq!(rendered["id"], json!("http://localhost/users"));
//! ```

pub mod error;
pub mod extractor;
pub mod merge;
pub mod property;
pub mod property_collection;
pub mod routes;

pub use error::{ApiProblem, Error, Result};
pub use extractor::{
	ExtractProperty, PropertyCollectionExtractor, PropertyExtractor, ServerUrl, UrlReverser,
	extract_properties,
};
pub use property::{JsonMap, Property, PropertyTarget, PropertyValue, RouteSpec};
pub use property_collection::{ID_KEYWORD, PropertyCollection, PropertySlot};
pub use routes::{RouteTable, StaticServerUrl};
