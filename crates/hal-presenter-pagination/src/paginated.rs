//! Page metadata exposed by paged collections.

/// Optional page accessors a collection may expose.
///
/// Every accessor defaults to `None`, so an adapter only implements the
/// names its data-access library actually provides. Several libraries name
/// the same concept differently (`prev_page` / `previous_page`,
/// `page_size` / `max_per_page` / `per_page`); the paginator probes them
/// in a fixed order.
///
/// # Examples
///
/// ```
/// use hal_presenter_pagination::Paginated;
///
/// struct Window {
///     page: u64,
/// }
///
/// impl Paginated for Window {
///     fn current_page(&self) -> Option<u64> {
///         Some(self.page)
///     }
///     fn next_page(&self) -> Option<u64> {
///         Some(self.page + 1)
///     }
/// }
///
/// let window = Window { page: 4 };
/// assert_eq!(window.current_page(), Some(4));
/// assert_eq!(window.prev_page(), None);
/// ```
pub trait Paginated {
	/// Current page number, or `None` when the collection is not paginated
	fn current_page(&self) -> Option<u64> {
		None
	}

	fn prev_page(&self) -> Option<u64> {
		None
	}

	fn previous_page(&self) -> Option<u64> {
		None
	}

	fn next_page(&self) -> Option<u64> {
		None
	}

	fn page_size(&self) -> Option<u64> {
		None
	}

	fn max_per_page(&self) -> Option<u64> {
		None
	}

	fn per_page(&self) -> Option<u64> {
		None
	}
}

/// Resolves the previous page, preferring `prev_page` over `previous_page`.
pub fn resolve_prev_page(page: &dyn Paginated) -> Option<u64> {
	page.prev_page().or_else(|| page.previous_page())
}

/// Resolves the page size, probing `page_size`, `max_per_page` and then `per_page`.
pub fn resolve_per_page(page: &dyn Paginated) -> Option<u64> {
	page.page_size()
		.or_else(|| page.max_per_page())
		.or_else(|| page.per_page())
}

/// Plain page metadata for collections that know their own cursor.
///
/// # Examples
///
/// ```
/// use hal_presenter_pagination::{PageInfo, Paginated};
///
/// let info = PageInfo::new(2, 10).with_prev(1).with_next(3);
/// assert_eq!(info.current_page(), Some(2));
/// assert_eq!(info.per_page(), Some(10));
/// assert_eq!(info.prev_page(), Some(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageInfo {
	pub current: Option<u64>,
	pub prev: Option<u64>,
	pub next: Option<u64>,
	pub per_page: Option<u64>,
}

impl PageInfo {
	pub fn new(current: u64, per_page: u64) -> Self {
		Self {
			current: Some(current),
			prev: None,
			next: None,
			per_page: Some(per_page),
		}
	}

	pub fn with_prev(mut self, prev: u64) -> Self {
		self.prev = Some(prev);
		self
	}

	pub fn with_next(mut self, next: u64) -> Self {
		self.next = Some(next);
		self
	}
}

impl Paginated for PageInfo {
	fn current_page(&self) -> Option<u64> {
		self.current
	}

	fn prev_page(&self) -> Option<u64> {
		self.prev
	}

	fn next_page(&self) -> Option<u64> {
		self.next
	}

	fn per_page(&self) -> Option<u64> {
		self.per_page
	}
}
