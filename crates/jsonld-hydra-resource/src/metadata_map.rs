//! Registry of [`Metadata`] keyed by type name.

use indexmap::IndexMap;
use jsonld_hydra_core::{JsonMap, Result};
use tracing::trace;

use crate::hydrator::HydratorRegistry;
use crate::metadata::Metadata;
use crate::object::DomainObject;

/// Type name to metadata.
///
/// Lookup for an object checks its own type name first, then its declared
/// ancestors in the order the object lists them.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_resource::{DomainObject, Metadata, MetadataMap, Record};
///
/// struct Admin;
///
/// impl DomainObject for Admin {
/// 	fn type_name(&self) -> &str {
/// 		"app::Admin"
/// 	}
///
/// 	fn ancestors(&self) -> &[&'static str] {
/// 		&["app::User"]
/// 	}
///
/// 	fn fields(&self) -> Record {
/// 		Record::new()
/// 	}
/// }
///
/// let mut map = MetadataMap::new();
/// map.insert(Metadata::new("app::User").with_route("user"));
///
/// assert_eq!(map.get(&Admin).and_then(|m| m.route()), Some("user"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetadataMap {
	map: IndexMap<String, Metadata>,
}

impl MetadataMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build from a type name to options mapping, see
	/// [`Metadata::from_options`].
	pub fn from_config(config: &IndexMap<String, JsonMap>, hydrators: &HydratorRegistry) -> Result<Self> {
		let mut map = Self::new();
		for (class, options) in config {
			map.insert(Metadata::from_options(class.clone(), options, hydrators)?);
		}
		Ok(map)
	}

	/// Register metadata under its class, replacing any previous entry.
	pub fn insert(&mut self, metadata: Metadata) -> &mut Self {
		self.map.insert(metadata.class().to_string(), metadata);
		self
	}

	pub fn with(mut self, metadata: Metadata) -> Self {
		self.insert(metadata);
		self
	}

	pub fn has_class(&self, class: &str) -> bool {
		self.map.contains_key(class)
	}

	pub fn get_by_class(&self, class: &str) -> Option<&Metadata> {
		self.map.get(class)
	}

	pub fn has(&self, object: &dyn DomainObject) -> bool {
		self.get(object).is_some()
	}

	/// Metadata for `object`, walking its declared ancestors.
	pub fn get(&self, object: &dyn DomainObject) -> Option<&Metadata> {
		if let Some(metadata) = self.map.get(object.type_name()) {
			return Some(metadata);
		}
		let found = object
			.ancestors()
			.iter()
			.find_map(|ancestor| self.map.get(*ancestor));
		if let Some(metadata) = found {
			trace!(
				class = object.type_name(),
				resolved = metadata.class(),
				"metadata resolved through ancestor"
			);
		}
		found
	}

	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}
}
