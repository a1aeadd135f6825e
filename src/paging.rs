//! Pagination envelope for list queries.
//!
//! List endpoints return a [`Page`] built from `SeaORM`'s paginator; the
//! request side is plain offset/limit arithmetic with a clamped page size.

use crate::errors::Result;
use sea_orm::{ConnectionTrait, Paginator, SelectorTrait};
use serde::{Deserialize, Serialize};

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u64 = 100;

const DEFAULT_PER_PAGE: u64 = 20;

/// Which slice of a listing to fetch. Pages are zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-indexed page number
    pub page: u64,
    /// Requested items per page; clamped to `1..=MAX_PER_PAGE`
    pub per_page: u64,
}

impl PageRequest {
    /// Creates a request for the given page and page size.
    #[must_use]
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Page size after clamping.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    /// Number of rows skipped before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page * self.limit()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results plus the counts needed to render pagination controls.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// The rows on this page
    pub items: Vec<T>,
    /// Zero-indexed page number that was fetched
    pub page: u64,
    /// Page size used for the fetch
    pub per_page: u64,
    /// Total matching rows across all pages
    pub total_items: u64,
    /// Total number of pages
    pub total_pages: u64,
}

/// Runs a prepared paginator for the requested page.
pub(crate) async fn fetch_page<'db, C, S>(
    paginator: Paginator<'db, C, S>,
    request: PageRequest,
) -> Result<Page<S::Item>>
where
    C: ConnectionTrait,
    S: SelectorTrait + 'db,
{
    let counts = paginator.num_items_and_pages().await?;
    let items = paginator.fetch_page(request.page).await?;
    Ok(Page {
        items,
        page: request.page,
        per_page: request.limit(),
        total_items: counts.number_of_items,
        total_pages: counts.number_of_pages,
    })
}
