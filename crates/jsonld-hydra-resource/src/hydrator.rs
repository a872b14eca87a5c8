//! Turning domain objects into records.
//!
//! Hydrators are registered by name in a [`HydratorRegistry`]. The
//! [`EntityHydratorManager`] picks one per object: the hydrator named in the
//! object's metadata, then one registered for its type, then the default.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsonld_hydra_core::{Error, Result};
use parking_lot::RwLock;

use crate::metadata_map::MetadataMap;
use crate::object::{DomainObject, Record};

/// Name under which [`ObjectPropertyHydrator`] is always registered.
pub const OBJECT_PROPERTY_HYDRATOR: &str = "ObjectProperty";

/// Extracts a record from a domain object.
pub trait Hydrator: Send + Sync {
	fn extract(&self, object: &dyn DomainObject) -> Result<Record>;
}

impl fmt::Debug for dyn Hydrator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Hydrator")
	}
}

impl<F> Hydrator for F
where
	F: Fn(&dyn DomainObject) -> Result<Record> + Send + Sync,
{
	fn extract(&self, object: &dyn DomainObject) -> Result<Record> {
		self(object)
	}
}

/// Reads the object's public fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectPropertyHydrator;

impl Hydrator for ObjectPropertyHydrator {
	fn extract(&self, object: &dyn DomainObject) -> Result<Record> {
		Ok(object.fields())
	}
}

/// Named hydrators.
#[derive(Clone)]
pub struct HydratorRegistry {
	hydrators: HashMap<String, Arc<dyn Hydrator>>,
}

impl HydratorRegistry {
	pub fn new() -> Self {
		let mut hydrators: HashMap<String, Arc<dyn Hydrator>> = HashMap::new();
		hydrators.insert(OBJECT_PROPERTY_HYDRATOR.to_string(), Arc::new(ObjectPropertyHydrator));
		Self { hydrators }
	}

	pub fn register(&mut self, name: impl Into<String>, hydrator: Arc<dyn Hydrator>) -> &mut Self {
		self.hydrators.insert(name.into(), hydrator);
		self
	}

	pub fn with(mut self, name: impl Into<String>, hydrator: Arc<dyn Hydrator>) -> Self {
		self.register(name, hydrator);
		self
	}

	pub fn has(&self, name: &str) -> bool {
		self.hydrators.contains_key(name)
	}

	pub fn get(&self, name: &str) -> Option<Arc<dyn Hydrator>> {
		self.hydrators.get(name).cloned()
	}

	/// Like [`HydratorRegistry::get`], failing for unknown names.
	pub fn resolve(&self, name: &str) -> Result<Arc<dyn Hydrator>> {
		self.get(name).ok_or_else(|| {
			Error::InvalidArgument(format!(
				"Hydrator \"{name}\" is not registered; cannot extract entities with it"
			))
		})
	}
}

impl Default for HydratorRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for HydratorRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<_> = self.hydrators.keys().collect();
		names.sort();
		f.debug_struct("HydratorRegistry").field("names", &names).finish()
	}
}

/// Selects the hydrator for an object.
pub struct EntityHydratorManager {
	registry: HydratorRegistry,
	metadata_map: Arc<MetadataMap>,
	hydrator_map: RwLock<HashMap<String, Arc<dyn Hydrator>>>,
	default_hydrator: Option<Arc<dyn Hydrator>>,
}

impl EntityHydratorManager {
	pub fn new(registry: HydratorRegistry, metadata_map: Arc<MetadataMap>) -> Self {
		Self {
			registry,
			metadata_map,
			hydrator_map: RwLock::new(HashMap::new()),
			default_hydrator: None,
		}
	}

	pub fn registry(&self) -> &HydratorRegistry {
		&self.registry
	}

	pub fn metadata_map(&self) -> &Arc<MetadataMap> {
		&self.metadata_map
	}

	/// Map a type name to a registered hydrator.
	pub fn add_hydrator(&self, class: impl Into<String>, name: &str) -> Result<()> {
		let hydrator = self.registry.resolve(name)?;
		self.add_hydrator_instance(class, hydrator);
		Ok(())
	}

	pub fn add_hydrator_instance(&self, class: impl Into<String>, hydrator: Arc<dyn Hydrator>) {
		self.hydrator_map.write().insert(class.into(), hydrator);
	}

	pub fn set_default_hydrator(&mut self, name: &str) -> Result<&mut Self> {
		self.default_hydrator = Some(self.registry.resolve(name)?);
		Ok(self)
	}

	pub fn set_default_hydrator_instance(&mut self, hydrator: Arc<dyn Hydrator>) -> &mut Self {
		self.default_hydrator = Some(hydrator);
		self
	}

	/// Hydrator for `object`, or `None` when nothing applies.
	pub fn get_hydrator_for_entity(&self, object: &dyn DomainObject) -> Option<Arc<dyn Hydrator>> {
		if let Some(hydrator) = self.metadata_map.get(object).and_then(|metadata| metadata.hydrator()) {
			return Some(hydrator.clone());
		}

		let hydrator_map = self.hydrator_map.read();
		std::iter::once(object.type_name())
			.chain(object.ancestors().iter().copied())
			.find_map(|class| hydrator_map.get(class).cloned())
			.or_else(|| self.default_hydrator.clone())
	}
}

/// Extracts records from objects using the hydrator the manager selects,
/// falling back to public fields.
pub struct EntityExtractor {
	hydrators: Arc<EntityHydratorManager>,
}

impl EntityExtractor {
	pub fn new(hydrators: Arc<EntityHydratorManager>) -> Self {
		Self { hydrators }
	}

	pub fn hydrators(&self) -> &Arc<EntityHydratorManager> {
		&self.hydrators
	}

	pub fn extract(&self, object: &dyn DomainObject) -> Result<Record> {
		match self.hydrators.get_hydrator_for_entity(object) {
			Some(hydrator) => hydrator.extract(object),
			None => ObjectPropertyHydrator.extract(object),
		}
	}
}
