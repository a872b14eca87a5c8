//! Paged sequences.

use std::fmt;
use std::sync::Arc;

use crate::object::Field;

/// Default number of items per page before a collection configures the
/// paginator.
pub const DEFAULT_ITEM_COUNT_PER_PAGE: i64 = 10;

/// Source of the items behind a [`Paginator`].
pub trait PaginatorAdapter: Send + Sync {
	/// Total number of items.
	fn count(&self) -> usize;

	/// Up to `limit` items starting at `offset`.
	fn items(&self, offset: usize, limit: usize) -> Vec<Field>;
}

/// In-memory adapter over a list of fields.
#[derive(Debug, Clone, Default)]
pub struct ArrayAdapter {
	items: Vec<Field>,
}

impl ArrayAdapter {
	pub fn new(items: Vec<Field>) -> Self {
		Self { items }
	}
}

impl PaginatorAdapter for ArrayAdapter {
	fn count(&self) -> usize {
		self.items.len()
	}

	fn items(&self, offset: usize, limit: usize) -> Vec<Field> {
		self.items.iter().skip(offset).take(limit).cloned().collect()
	}
}

/// A sequence split into pages.
///
/// An item count per page below 1 puts every item on a single page.
///
/// # Examples
///
/// ```
/// use jsonld_hydra_resource::{Field, Paginator};
/// use serde_json::json;
///
/// let items = (1..=25).map(|id| Field::from(json!({"id": id}))).collect();
/// let mut paginator = Paginator::from_items(items);
/// paginator.set_item_count_per_page(10);
/// paginator.set_current_page_number(3);
///
/// assert_eq!(paginator.page_count(), 3);
/// assert_eq!(paginator.current_items().len(), 5);
/// ```
#[derive(Clone)]
pub struct Paginator {
	adapter: Arc<dyn PaginatorAdapter>,
	item_count_per_page: i64,
	current_page: usize,
}

impl Paginator {
	pub fn new(adapter: Arc<dyn PaginatorAdapter>) -> Self {
		Self {
			adapter,
			item_count_per_page: DEFAULT_ITEM_COUNT_PER_PAGE,
			current_page: 1,
		}
	}

	pub fn from_items(items: Vec<Field>) -> Self {
		Self::new(Arc::new(ArrayAdapter::new(items)))
	}

	pub fn set_item_count_per_page(&mut self, count: i64) -> &mut Self {
		self.item_count_per_page = count;
		self
	}

	pub fn set_current_page_number(&mut self, page: usize) -> &mut Self {
		self.current_page = page;
		self
	}

	pub fn total_item_count(&self) -> usize {
		self.adapter.count()
	}

	pub fn item_count_per_page(&self) -> usize {
		match usize::try_from(self.item_count_per_page) {
			Ok(count) if count > 0 => count,
			_ => self.total_item_count().max(1),
		}
	}

	/// Number of pages; zero when there are no items.
	pub fn page_count(&self) -> usize {
		self.total_item_count().div_ceil(self.item_count_per_page())
	}

	/// Requested page clamped into `[1, page_count]`.
	pub fn current_page_number(&self) -> usize {
		self.current_page.clamp(1, self.page_count().max(1))
	}

	pub fn current_items(&self) -> Vec<Field> {
		let per_page = self.item_count_per_page();
		let offset = (self.current_page_number() - 1) * per_page;
		self.adapter.items(offset, per_page)
	}
}

impl fmt::Debug for Paginator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Paginator")
			.field("total_item_count", &self.total_item_count())
			.field("item_count_per_page", &self.item_count_per_page)
			.field("current_page", &self.current_page)
			.finish()
	}
}
