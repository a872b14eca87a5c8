//! # jsonld-hydra
//!
//! JSON-LD rendering for API resources, producing Hydra `Collection`
//! documents with route-derived links.
//!
//! Domain data is wrapped in entities and collections that carry typed
//! relations. Relations resolve to absolute URLs through a route reverser and
//! a server URL, and the renderer walks embedded objects described by
//! metadata, guarding against reference cycles.
//!
//! ## Feature Flags
//!
//! - `core` - Property model, route reversal and extractors
//! - `resource` - Entities, collections, metadata, hydrators and pagination
//! - `renderer` (default) - Rendering engine, hooks and settings
//!
//! ## Quick Example
//!
//! ```
//! use jsonld_hydra::prelude::*;
//! use serde_json::json;
//!
//! let renderer = JsonLdRenderer::builder()
//! 	.url_reverser(
//! 		RouteTable::new()
//! 			.with_route("users", "/users")
//! 			.with_route("user", "/users/{id}"),
//! 	)
//! 	.server_url(StaticServerUrl::new("https://api.example.com"))
//! 	.build()
//! 	.unwrap();
//!
//! let collection = renderer
//! 	.create_collection(Field::from(json!([{"name": "ada"}, {"name": "grace"}])), "users")
//! 	.unwrap();
//! let rendered = renderer.render_collection(&collection).unwrap();
//! let document = rendered.document().unwrap();
//!
//! assert_eq!(document["id"], json!("https://api.example.com/users"));
//! assert_eq!(document["totalItems"], json!(2));
//! assert_eq!(document["@context"], json!("http://www.w3.org/ns/hydra/context.jsonld"));
//! ```

#[cfg(feature = "core")]
pub mod core {
	//! Property model and extractors.
	pub use jsonld_hydra_core::*;
}

#[cfg(feature = "resource")]
pub mod resource {
	//! Resources, metadata and pagination.
	pub use jsonld_hydra_resource::*;
}

#[cfg(feature = "renderer")]
pub mod renderer {
	//! Rendering engine.
	pub use jsonld_hydra_renderer::*;
}

// Re-export core types
#[cfg(feature = "core")]
pub use jsonld_hydra_core::{
	ApiProblem, Error, ExtractProperty, JsonMap, Property, PropertyCollection, Result, RouteSpec,
	RouteTable, ServerUrl, StaticServerUrl, UrlReverser,
};

// Re-export resources
#[cfg(feature = "resource")]
pub use jsonld_hydra_resource::{
	Collection, DomainObject, Entity, Field, Hydrator, HydratorRegistry, Metadata, MetadataMap,
	ObjectRef, PaginationInjector, Paginator, Record, Resource, ResourceFactory,
};

// Re-export the renderer
#[cfg(feature = "renderer")]
pub use jsonld_hydra_renderer::{
	JsonLdRenderer, JsonLdRendererBuilder, JsonLdSettings, RenderHooks, Rendered, SettingsError,
};

/// Commonly used types.
pub mod prelude {
	#[cfg(feature = "core")]
	pub use crate::{
		ApiProblem, Error, JsonMap, Property, PropertyCollection, Result, RouteTable,
		StaticServerUrl,
	};

	#[cfg(feature = "resource")]
	pub use crate::{
		Collection, DomainObject, Entity, Field, HydratorRegistry, Metadata, MetadataMap, ObjectRef,
		Paginator, Record,
	};
	#[cfg(feature = "resource")]
	pub use jsonld_hydra_resource::PropertyCollectionAware;

	#[cfg(feature = "renderer")]
	pub use crate::{JsonLdRenderer, JsonLdSettings, Rendered};
}
