//! # jsonld-hydra-resource
//!
//! Resource model for the JSON-LD/Hydra renderer.
//!
//! - [`DomainObject`] / [`Field`] / [`Record`]: application objects and the
//!   records extracted from them
//! - [`Entity`] and [`Collection`]: the resources the renderer walks
//! - [`Paginator`]: paged sequences behind paginated collections
//! - [`Metadata`] and [`MetadataMap`]: per-type rendering configuration
//! - [`HydratorRegistry`], [`EntityHydratorManager`], [`EntityExtractor`]:
//!   hydrator selection and record extraction
//! - [`ResourceFactory`]: entities and collections built from metadata
//! - [`PaginationInjector`]: Hydra `view` links for paged collections

pub mod collection;
pub mod entity;
pub mod hydrator;
pub mod metadata;
pub mod metadata_map;
pub mod object;
pub mod pagination;
pub mod paginator;
pub mod resource_factory;

pub use collection::{Collection, CollectionPayload};
pub use entity::{Entity, EntityPayload, PropertyCollectionAware};
pub use hydrator::{
	EntityExtractor, EntityHydratorManager, Hydrator, HydratorRegistry, OBJECT_PROPERTY_HYDRATOR,
	ObjectPropertyHydrator,
};
pub use metadata::{Metadata, RouteParam};
pub use metadata_map::MetadataMap;
pub use object::{DomainObject, Field, ObjectRef, Record, object_id, record_from_json};
pub use pagination::{InjectPagination, PaginationInjector, PaginationStatus};
pub use paginator::{ArrayAdapter, Paginator, PaginatorAdapter};
pub use resource_factory::{Resource, ResourceFactory};
