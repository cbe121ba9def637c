//! Pagination of filtered material lists
//!
//! Applied strictly after filtering. The requested page is clamped into
//! `[1, total_pages]`, so narrowing a filter never leaves the caller on an
//! empty out-of-range page.

use serde::Serialize;

/// Default page size for all material listings
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    /// Total number of pages (at least 1, even for empty results)
    pub total_pages: usize,
    /// Index of the first item on the page
    pub offset: usize,
    pub page_size: usize,
}

/// Calculate pagination metadata from total results and requested page
///
/// # Examples
/// ```
/// use coursehub_catalog::pagination::calculate_pagination;
///
/// // 20 results, 9 per page = 3 pages (9 + 9 + 2)
/// let p = calculate_pagination(20, 2, 9);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 9);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(20, 99, 9);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 18);
/// ```
pub fn calculate_pagination(total_results: usize, requested_page: usize, page_size: usize) -> Pagination {
    let page_size = page_size.max(1);
    let total_pages = total_results.div_ceil(page_size).max(1);
    let page = requested_page.clamp(1, total_pages);
    let offset = (page - 1) * page_size;

    Pagination {
        page,
        total_pages,
        offset,
        page_size,
    }
}

/// One page of items plus its metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub total_results: usize,
    #[serde(flatten)]
    pub pagination: Pagination,
    pub items: Vec<T>,
}

/// Slice one page out of an already filtered list
pub fn paginate<T: Clone>(items: &[T], requested_page: usize, page_size: usize) -> Page<T> {
    let pagination = calculate_pagination(items.len(), requested_page, page_size);
    let end = (pagination.offset + pagination.page_size).min(items.len());

    Page {
        total_results: items.len(),
        pagination,
        items: items[pagination.offset..end].to_vec(),
    }
}
