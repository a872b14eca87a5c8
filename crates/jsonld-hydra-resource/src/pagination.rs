//! Hydra pagination links for paged collections.

use http::StatusCode;
use jsonld_hydra_core::merge::merge_maps;
use jsonld_hydra_core::{ApiProblem, Error, ID_KEYWORD, JsonMap, Property, PropertyCollection, Result, RouteSpec};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::collection::Collection;

pub const VIEW_KEYWORD: &str = "view";
pub const FIRST_PAGE_KEYWORD: &str = "firstPage";
pub const LAST_PAGE_KEYWORD: &str = "lastPage";
pub const PREVIOUS_PAGE_KEYWORD: &str = "previousPage";
pub const NEXT_PAGE_KEYWORD: &str = "nextPage";

/// Outcome of [`InjectPagination::inject_pagination_properties`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationStatus {
	/// The payload is not paginated.
	Skipped,
	/// The paginator was configured; links were added unless it is empty.
	Applied,
	/// The requested page does not exist.
	Problem(ApiProblem),
}

/// Adds pagination relations to a collection.
pub trait InjectPagination: Send + Sync {
	fn inject_pagination_properties(&self, collection: &mut Collection) -> Result<PaginationStatus>;
}

/// Configures the paginator from the collection's page and page size, then
/// adds a page-less `id` and a `view` holding `id`, `firstPage`,
/// `lastPage`, `previousPage` and `nextPage` links.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_resource::{
/// 	Collection, Field, InjectPagination, PaginationInjector, PaginationStatus, Paginator,
/// };
/// use serde_json::json;
///
/// let items = (1..=100).map(|id| Field::from(json!({"id": id}))).collect();
/// let mut collection = Collection::from_paginator(Paginator::from_items(items));
/// collection.set_collection_route("resource").set_page_size(20).unwrap();
/// collection.set_page(6).unwrap();
///
/// let status = PaginationInjector.inject_pagination_properties(&mut collection).unwrap();
/// assert!(matches!(status, PaginationStatus::Problem(problem) if problem.status().as_u16() == 409));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationInjector;

impl InjectPagination for PaginationInjector {
	fn inject_pagination_properties(&self, collection: &mut Collection) -> Result<PaginationStatus> {
		let page = collection.page();
		let page_size = collection.page_size();
		let Some(paginator) = collection.paginator_mut() else {
			return Ok(PaginationStatus::Skipped);
		};

		paginator.set_item_count_per_page(page_size).set_current_page_number(page);
		let page_count = paginator.page_count();
		if page_count == 0 {
			return Ok(PaginationStatus::Applied);
		}

		// `Collection::set_page` already rejects pages below 1.
		if page < 1 || page > page_count {
			warn!(page, page_count, "requested page outside of paginator range");
			return Ok(PaginationStatus::Problem(ApiProblem::new(
				StatusCode::CONFLICT,
				"Invalid page provided",
			)));
		}

		let id = pagination_property(ID_KEYWORD, collection, None)?;
		collection.properties_mut().add(id, true);

		let mut view = PropertyCollection::new();
		view.add(pagination_property(ID_KEYWORD, collection, Some(page))?, true);
		view.add(pagination_property(FIRST_PAGE_KEYWORD, collection, None)?, false);
		view.add(pagination_property(LAST_PAGE_KEYWORD, collection, Some(page_count))?, false);
		if page > 1 {
			view.add(pagination_property(PREVIOUS_PAGE_KEYWORD, collection, Some(page - 1))?, false);
		}
		if page < page_count {
			view.add(pagination_property(NEXT_PAGE_KEYWORD, collection, Some(page + 1))?, false);
		}
		collection
			.properties_mut()
			.add(Property::new(VIEW_KEYWORD).with_value(view)?, false);

		debug!(page, page_count, "pagination properties injected");
		Ok(PaginationStatus::Applied)
	}
}

fn pagination_property(keyword: &str, collection: &Collection, page: Option<usize>) -> Result<Property> {
	let Some(route) = collection.collection_route() else {
		return Err(Error::InvalidArgument(format!(
			"Unable to create the \"{keyword}\" pagination link; the collection has no route"
		)));
	};

	let mut options: JsonMap = collection.collection_route_options().clone();
	let page = page.map_or(Value::Null, |page| json!(page));
	if let Value::Object(query) = json!({"query": {"page": page}}) {
		merge_maps(&mut options, query);
	}

	Property::new(keyword).with_route(
		RouteSpec::new(route)
			.with_params(collection.collection_route_params().clone())
			.with_options(options),
	)
}
