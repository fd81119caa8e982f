//! Page-based pagination helpers.

use serde::Serialize;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// 1-based page request. Page `0` is treated as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Rows to skip; saturates instead of overflowing on huge page numbers.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> usize {
        self.per_page
    }
}

/// One page of results plus enough information to render page links.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    /// Builds a page from a `(total, items)` repository result.
    pub fn from_total(items: Vec<T>, pagination: Pagination, total: usize) -> Self {
        Self {
            items,
            page: pagination.page.max(1),
            total_pages: total.div_ceil(pagination.per_page.max(1)),
            total,
        }
    }
}
