//! A renderable set of resources.

use jsonld_hydra_core::{Error, JsonMap, PropertyCollection, Result};
use serde_json::Value;

use crate::entity::PropertyCollectionAware;
use crate::object::{Field, ObjectRef};
use crate::paginator::Paginator;

pub const DEFAULT_COLLECTION_NAME: &str = "member";
pub const DEFAULT_PAGE_SIZE: i64 = 30;
pub const DEFAULT_IDENTIFIER_NAME: &str = "id";

/// Members of a collection.
#[derive(Debug, Clone)]
pub enum CollectionPayload {
	List(Vec<Field>),
	/// An iterable domain object; its type drives metadata lookup.
	Object(ObjectRef),
	Paginated(Paginator),
}

/// Collection payload plus pagination state and route metadata for the
/// collection itself and for its members.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_resource::Collection;
/// use serde_json::json;
///
/// let mut collection = Collection::from_value(json!([{"id": 1}, {"id": 2}])).unwrap();
/// collection.set_collection_route("resource").set_entity_route("resource/item");
///
/// assert_eq!(collection.collection_name(), "member");
/// assert_eq!(collection.count(), Some(2));
/// assert!(collection.set_page(0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Collection {
	payload: CollectionPayload,
	attributes: JsonMap,
	collection_name: String,
	collection_route: Option<String>,
	collection_route_params: JsonMap,
	collection_route_options: JsonMap,
	entity_route: Option<String>,
	entity_route_params: JsonMap,
	entity_route_options: JsonMap,
	entity_identifier_name: String,
	route_identifier_name: String,
	page: usize,
	page_size: i64,
	properties: PropertyCollection,
	entity_properties: Option<PropertyCollection>,
}

impl Collection {
	pub fn new(payload: CollectionPayload) -> Self {
		Self {
			payload,
			attributes: JsonMap::new(),
			collection_name: DEFAULT_COLLECTION_NAME.to_string(),
			collection_route: None,
			collection_route_params: JsonMap::new(),
			collection_route_options: JsonMap::new(),
			entity_route: None,
			entity_route_params: JsonMap::new(),
			entity_route_options: JsonMap::new(),
			entity_identifier_name: DEFAULT_IDENTIFIER_NAME.to_string(),
			route_identifier_name: DEFAULT_IDENTIFIER_NAME.to_string(),
			page: 1,
			page_size: DEFAULT_PAGE_SIZE,
			properties: PropertyCollection::new(),
			entity_properties: None,
		}
	}

	pub fn from_fields(members: Vec<Field>) -> Self {
		Self::new(CollectionPayload::List(members))
	}

	pub fn from_paginator(paginator: Paginator) -> Self {
		Self::new(CollectionPayload::Paginated(paginator))
	}

	/// Collection over an iterable domain object.
	pub fn from_object(object: ObjectRef) -> Result<Self> {
		if object.members().is_none() {
			return Err(Error::InvalidCollection(format!(
				"expected an iterable object; \"{}\" does not expose members",
				object.type_name()
			)));
		}
		Ok(Self::new(CollectionPayload::Object(object)))
	}

	/// Collection over a JSON array, or over the values of a JSON object.
	pub fn from_value(payload: Value) -> Result<Self> {
		let members = match payload {
			Value::Array(items) => items.into_iter().map(Field::Value).collect(),
			Value::Object(map) => map.into_iter().map(|(_, value)| Field::Value(value)).collect(),
			other => {
				return Err(Error::InvalidCollection(format!(
					"expected an array or object; received {other}"
				)));
			}
		};
		Ok(Self::from_fields(members))
	}

	pub fn payload(&self) -> &CollectionPayload {
		&self.payload
	}

	pub fn is_paginated(&self) -> bool {
		matches!(self.payload, CollectionPayload::Paginated(_))
	}

	pub fn paginator(&self) -> Option<&Paginator> {
		match &self.payload {
			CollectionPayload::Paginated(paginator) => Some(paginator),
			_ => None,
		}
	}

	pub fn paginator_mut(&mut self) -> Option<&mut Paginator> {
		match &mut self.payload {
			CollectionPayload::Paginated(paginator) => Some(paginator),
			_ => None,
		}
	}

	/// Members to render: the whole list, the object's members, or the
	/// paginator's current page.
	pub fn members(&self) -> Result<Vec<Field>> {
		match &self.payload {
			CollectionPayload::List(members) => Ok(members.clone()),
			CollectionPayload::Object(object) => object.members().ok_or_else(|| {
				Error::InvalidCollection(format!(
					"\"{}\" no longer exposes members",
					object.type_name()
				))
			}),
			CollectionPayload::Paginated(paginator) => Ok(paginator.current_items()),
		}
	}

	/// Element count of non-paginated payloads.
	pub fn count(&self) -> Option<usize> {
		match &self.payload {
			CollectionPayload::List(members) => Some(members.len()),
			CollectionPayload::Object(object) => object.members().map(|members| members.len()),
			CollectionPayload::Paginated(_) => None,
		}
	}

	pub fn attributes(&self) -> &JsonMap {
		&self.attributes
	}

	pub fn set_attributes(&mut self, attributes: JsonMap) -> &mut Self {
		self.attributes = attributes;
		self
	}

	pub fn collection_name(&self) -> &str {
		&self.collection_name
	}

	pub fn set_collection_name(&mut self, name: impl Into<String>) -> &mut Self {
		self.collection_name = name.into();
		self
	}

	pub fn collection_route(&self) -> Option<&str> {
		self.collection_route.as_deref()
	}

	pub fn set_collection_route(&mut self, route: impl Into<String>) -> &mut Self {
		self.collection_route = Some(route.into());
		self
	}

	pub fn collection_route_params(&self) -> &JsonMap {
		&self.collection_route_params
	}

	pub fn set_collection_route_params(&mut self, params: JsonMap) -> &mut Self {
		self.collection_route_params = params;
		self
	}

	pub fn collection_route_options(&self) -> &JsonMap {
		&self.collection_route_options
	}

	pub fn set_collection_route_options(&mut self, options: JsonMap) -> &mut Self {
		self.collection_route_options = options;
		self
	}

	pub fn entity_route(&self) -> Option<&str> {
		self.entity_route.as_deref()
	}

	pub fn set_entity_route(&mut self, route: impl Into<String>) -> &mut Self {
		self.entity_route = Some(route.into());
		self
	}

	pub fn entity_route_params(&self) -> &JsonMap {
		&self.entity_route_params
	}

	pub fn set_entity_route_params(&mut self, params: JsonMap) -> &mut Self {
		self.entity_route_params = params;
		self
	}

	pub fn entity_route_options(&self) -> &JsonMap {
		&self.entity_route_options
	}

	pub fn set_entity_route_options(&mut self, options: JsonMap) -> &mut Self {
		self.entity_route_options = options;
		self
	}

	pub fn entity_identifier_name(&self) -> &str {
		&self.entity_identifier_name
	}

	pub fn set_entity_identifier_name(&mut self, name: impl Into<String>) -> &mut Self {
		self.entity_identifier_name = name.into();
		self
	}

	pub fn route_identifier_name(&self) -> &str {
		&self.route_identifier_name
	}

	pub fn set_route_identifier_name(&mut self, name: impl Into<String>) -> &mut Self {
		self.route_identifier_name = name.into();
		self
	}

	pub fn page(&self) -> usize {
		self.page
	}

	/// Requested page; must be at least 1.
	pub fn set_page(&mut self, page: i64) -> Result<&mut Self> {
		self.page = usize::try_from(page)
			.ok()
			.filter(|page| *page >= 1)
			.ok_or_else(|| Error::InvalidArgument(format!("Page must be a positive integer; received \"{page}\"")))?;
		Ok(self)
	}

	pub fn page_size(&self) -> i64 {
		self.page_size
	}

	/// Items per page; -1 disables pagination.
	pub fn set_page_size(&mut self, size: i64) -> Result<&mut Self> {
		if size < 1 && size != -1 {
			return Err(Error::InvalidArgument(format!(
				"size must be a positive integer or -1 (to disable pagination); received \"{size}\""
			)));
		}
		self.page_size = size;
		Ok(self)
	}

	pub fn properties(&self) -> &PropertyCollection {
		&self.properties
	}

	pub fn properties_mut(&mut self) -> &mut PropertyCollection {
		&mut self.properties
	}

	pub fn set_properties(&mut self, properties: PropertyCollection) -> &mut Self {
		self.properties = properties;
		self
	}

	/// Default relations given to members that carry none of their own.
	pub fn entity_properties(&self) -> Option<&PropertyCollection> {
		self.entity_properties.as_ref()
	}

	pub fn set_entity_properties(&mut self, properties: PropertyCollection) -> &mut Self {
		self.entity_properties = Some(properties);
		self
	}
}

impl PropertyCollectionAware for Collection {
	fn properties(&self) -> &PropertyCollection {
		&self.properties
	}

	fn properties_mut(&mut self) -> &mut PropertyCollection {
		&mut self.properties
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn collection() -> Collection {
		Collection::from_value(json!([{"id": 1}, {"id": 2}, {"id": 3}])).unwrap()
	}

	#[rstest]
	fn test_defaults(collection: Collection) {
		assert_eq!(collection.collection_name(), "member");
		assert_eq!(collection.page(), 1);
		assert_eq!(collection.page_size(), 30);
		assert_eq!(collection.entity_identifier_name(), "id");
		assert_eq!(collection.route_identifier_name(), "id");
		assert!(collection.collection_route().is_none());
		assert!(collection.entity_properties().is_none());
	}

	#[rstest]
	#[case(json!(null))]
	#[case(json!(1))]
	#[case(json!("members"))]
	fn test_non_iterable_payload_rejected(#[case] payload: Value) {
		assert!(matches!(Collection::from_value(payload), Err(Error::InvalidCollection(_))));
	}

	#[rstest]
	#[case(0)]
	#[case(-3)]
	fn test_page_must_be_positive(mut collection: Collection, #[case] page: i64) {
		assert!(matches!(collection.set_page(page), Err(Error::InvalidArgument(_))));
		assert_eq!(collection.page(), 1);
	}

	#[rstest]
	#[case(-1, true)]
	#[case(1, true)]
	#[case(0, false)]
	#[case(-2, false)]
	fn test_page_size_validation(mut collection: Collection, #[case] size: i64, #[case] accepted: bool) {
		assert_eq!(collection.set_page_size(size).is_ok(), accepted);
	}

	#[rstest]
	fn test_members_of_paginated_payload_follow_current_page() {
		let items = (1..=5).map(|id| Field::from(json!({"id": id}))).collect();
		let mut paginator = Paginator::from_items(items);
		paginator.set_item_count_per_page(2).set_current_page_number(3);
		let collection = Collection::from_paginator(paginator);

		let members = collection.members().unwrap();

		assert_eq!(members.len(), 1);
		assert!(collection.count().is_none());
	}
}
