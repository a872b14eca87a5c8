//! Keyword-indexed set of properties.

use indexmap::IndexMap;
use indexmap::map::Iter;

use crate::error::Result;
use crate::property::Property;

/// Keyword under which the self link lives. Always single-valued.
pub const ID_KEYWORD: &str = "id";

/// Content stored under one keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySlot {
	Single(Property),
	/// Relations rendered as a nested object.
	Nested(PropertyCollection),
	/// Repeated keyword; extraction requires every element to be a
	/// [`PropertySlot::Single`].
	Many(Vec<PropertySlot>),
}

impl PropertySlot {
	/// Whether `property` is already stored in this slot.
	pub fn contains(&self, property: &Property) -> bool {
		match self {
			PropertySlot::Single(existing) => existing == property,
			PropertySlot::Nested(_) => false,
			PropertySlot::Many(slots) => slots.iter().any(|slot| slot.contains(property)),
		}
	}
}

/// Ordered mapping from keyword to property slot.
///
/// Adding a keyword twice without `overwrite` turns the slot into a list;
/// the `id` keyword is always overwritten.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_core::{Property, PropertyCollection, PropertySlot};
///
/// let mut properties = PropertyCollection::new();
/// properties.add(Property::new("tag").with_url("http://e/a").unwrap(), false);
/// properties.add(Property::new("tag").with_url("http://e/b").unwrap(), false);
///
/// assert!(matches!(properties.get("tag"), Some(PropertySlot::Many(list)) if list.len() == 2));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyCollection {
	properties: IndexMap<String, PropertySlot>,
}

impl PropertyCollection {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a property under its keyword.
	pub fn add(&mut self, property: Property, overwrite: bool) -> &mut Self {
		let keyword = property.keyword().to_string();
		self.add_slot(keyword, PropertySlot::Single(property), overwrite)
	}

	/// Store a nested collection under `keyword`, following the same
	/// overwrite and list rules as [`PropertyCollection::add`].
	pub fn add_nested(&mut self, keyword: impl Into<String>, nested: PropertyCollection, overwrite: bool) -> &mut Self {
		self.add_slot(keyword.into(), PropertySlot::Nested(nested), overwrite)
	}

	fn add_slot(&mut self, keyword: String, slot: PropertySlot, overwrite: bool) -> &mut Self {
		if overwrite || keyword == ID_KEYWORD || !self.properties.contains_key(&keyword) {
			self.properties.insert(keyword, slot);
			return self;
		}

		if let Some(existing) = self.properties.get_mut(&keyword) {
			match existing {
				PropertySlot::Many(slots) => slots.push(slot),
				single => {
					let previous = std::mem::replace(single, PropertySlot::Many(Vec::with_capacity(2)));
					*single = PropertySlot::Many(vec![previous, slot]);
				}
			}
		}
		self
	}

	/// Add every property from a declarative spec list, see
	/// [`Property::factory`].
	pub fn add_from_specs<'a>(&mut self, specs: impl IntoIterator<Item = &'a serde_json::Value>) -> Result<&mut Self> {
		for spec in specs {
			let property = Property::factory(spec)?;
			self.add(property, false);
		}
		Ok(self)
	}

	pub fn get(&self, keyword: &str) -> Option<&PropertySlot> {
		self.properties.get(keyword)
	}

	pub fn has(&self, keyword: &str) -> bool {
		self.properties.contains_key(keyword)
	}

	/// Remove a keyword, returning whether it was present.
	pub fn remove(&mut self, keyword: &str) -> bool {
		self.properties.shift_remove(keyword).is_some()
	}

	pub fn len(&self) -> usize {
		self.properties.len()
	}

	pub fn is_empty(&self) -> bool {
		self.properties.is_empty()
	}

	pub fn iter(&self) -> Iter<'_, String, PropertySlot> {
		self.properties.iter()
	}
}

impl<'a> IntoIterator for &'a PropertyCollection {
	type Item = (&'a String, &'a PropertySlot);
	type IntoIter = Iter<'a, String, PropertySlot>;

	fn into_iter(self) -> Self::IntoIter {
		self.properties.iter()
	}
}

impl FromIterator<Property> for PropertyCollection {
	fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
		let mut collection = PropertyCollection::new();
		for property in iter {
			collection.add(property, false);
		}
		collection
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn url_property() -> Property {
		Property::new("describedBy").with_url("http://example.com/docs").unwrap()
	}

	#[rstest]
	fn test_starts_empty() {
		let properties = PropertyCollection::new();
		assert_eq!(properties.len(), 0);
		assert!(properties.is_empty());
	}

	#[rstest]
	fn test_add_and_get(url_property: Property) {
		let mut properties = PropertyCollection::new();
		properties.add(url_property.clone(), false);

		assert!(properties.has("describedBy"));
		assert_eq!(properties.get("describedBy"), Some(&PropertySlot::Single(url_property)));
	}

	#[rstest]
	fn test_repeated_keyword_becomes_ordered_list() {
		let first = Property::new("tag").with_url("http://e/a").unwrap();
		let second = Property::new("tag").with_url("http://e/b").unwrap();
		let mut properties = PropertyCollection::new();

		properties.add(first.clone(), false);
		properties.add(second.clone(), false);

		assert_eq!(
			properties.get("tag"),
			Some(&PropertySlot::Many(vec![
				PropertySlot::Single(first),
				PropertySlot::Single(second)
			]))
		);
	}

	#[rstest]
	#[case(false)]
	#[case(true)]
	fn test_id_always_overwrites(#[case] overwrite: bool) {
		let mut properties = PropertyCollection::new();
		properties.add(Property::new("id").with_url("http://e/1").unwrap(), false);
		properties.add(Property::new("id").with_url("http://e/2").unwrap(), overwrite);

		let Some(PropertySlot::Single(id)) = properties.get("id") else {
			panic!("id should stay single-valued");
		};
		assert_eq!(id.url(), Some("http://e/2"));
	}

	#[rstest]
	fn test_overwrite_replaces_existing(url_property: Property) {
		let mut properties = PropertyCollection::new();
		properties.add(url_property, false);
		let replacement = Property::new("describedBy").with_value(json!("inline")).unwrap();
		properties.add(replacement.clone(), true);

		assert_eq!(properties.get("describedBy"), Some(&PropertySlot::Single(replacement)));
	}

	#[rstest]
	fn test_remove_reports_presence(url_property: Property) {
		let mut properties = PropertyCollection::new();
		properties.add(url_property, false);

		assert!(properties.remove("describedBy"));
		assert!(!properties.remove("describedBy"));
		assert!(!properties.has("describedBy"));
	}

	#[rstest]
	fn test_iteration_follows_insertion_order() {
		let properties: PropertyCollection = ["b", "a", "c"]
			.into_iter()
			.map(|keyword| Property::new(keyword).with_value(json!(keyword)).unwrap())
			.collect();

		let keywords: Vec<_> = properties.iter().map(|(keyword, _)| keyword.as_str()).collect();
		assert_eq!(keywords, vec!["b", "a", "c"]);
	}

	#[rstest]
	fn test_contains_checks_list_members() {
		let first = Property::new("tag").with_url("http://e/a").unwrap();
		let second = Property::new("tag").with_url("http://e/b").unwrap();
		let slot = PropertySlot::Many(vec![PropertySlot::Single(first.clone())]);

		assert!(slot.contains(&first));
		assert!(!slot.contains(&second));
	}
}
