//! # jsonld-hydra-renderer
//!
//! Recursive JSON-LD renderer producing Hydra `Collection` documents.
//!
//! ## Features
//!
//! - **Embedded resources**: metadata-described objects found in payloads
//!   render as nested entities or member lists
//! - **Cycle detection**: revisiting an object on the render path fails unless
//!   a `max_depth` limit truncates the graph
//! - **Pagination**: paged collections gain `view` links, `itemsPerPage` and
//!   `totalItems`; out-of-range pages yield a 409 problem value
//! - **Hooks**: listeners before and after entity and collection rendering,
//!   and per collection member
//! - **Settings**: renderer and metadata configuration from TOML or JSON
//!
//! ## Quick Start
//!
//! ```
//! use jsonld_hydra_core::{Property, RouteTable, StaticServerUrl};
//! use jsonld_hydra_renderer::{JsonLdRenderer, Rendered};
//! use jsonld_hydra_resource::Collection;
//! use serde_json::json;
//!
//! let renderer = JsonLdRenderer::builder()
//! 	.url_reverser(RouteTable::new().with_route("resource", "/resource"))
//! 	.server_url(StaticServerUrl::new("http://localhost.localdomain"))
//! 	.build()
//! 	.unwrap();
//!
//! let mut collection = Collection::from_value(json!([{"id": 1}, {"id": 2}])).unwrap();
//! let mut self_link = Property::new("id");
//! self_link.set_route("resource", None, None).unwrap();
//! collection.properties_mut().add(self_link, false);
//!
//! let Rendered::Document(document) = renderer.render_collection(&collection).unwrap() else {
//! 	panic!("unexpected problem");
//! };
//! assert_eq!(document["id"], json!("http://localhost.localdomain/resource"));
//! assert_eq!(document["totalItems"], json!(2));
//! assert_eq!(document["@type"], json!("Collection"));
//! ```

pub mod context;
pub mod hooks;
pub mod identifier;
pub mod renderer;
pub mod settings;

pub use context::TraversalContext;
pub use hooks::{CollectionMemberEvent, RenderHooks};
pub use identifier::{
	AccessorResolver, IdentifierResolver, IdentifierResolverChain, IdentifierSubject, PublicFieldResolver,
	RecordKeyResolver,
};
pub use renderer::{
	COLLECTION_TYPE, HYDRA_CONTEXT, ITEMS_PER_PAGE_KEY, JsonLdRenderer, JsonLdRendererBuilder,
	MEMBER_PROPERTIES_FIELD, PARTIAL_COLLECTION_VIEW_TYPE, Rendered, TOTAL_ITEMS_KEY,
};
pub use settings::{JsonLdSettings, RendererOptions, SettingsError};
