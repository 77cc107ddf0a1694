// ABOUTME: Page request validation and paginated response envelopes
// ABOUTME: Raw page/size query fields are clamped once when a Page is built

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated page request. Listing queries carry raw `page`/`size`
/// fields (serde_urlencoded cannot flatten numerics into a shared
/// params struct), so normalization lives here instead of per handler.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    number: i64,
    size: i64,
}

impl Page {
    /// Build from optional query fields. Pages are 1-indexed; sizes are
    /// clamped to 1..=MAX_PAGE_SIZE.
    pub fn from_query(page: Option<i64>, size: Option<i64>) -> Self {
        Self {
            number: page.unwrap_or(1).max(1),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }
}

/// Pagination state returned alongside each page of results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: Page, total_items: i64) -> Self {
        let total_pages = (total_items + page.size - 1) / page.size;
        Self {
            data,
            pagination: PaginationMeta {
                page: page.number,
                page_size: page.size,
                total_items,
                total_pages,
                has_next_page: page.number < total_pages,
                has_previous_page: page.number > 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_defaults() {
        let page = Page::from_query(None, None);
        assert_eq!(page.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_from_query_clamps() {
        let page = Page::from_query(Some(-5), Some(10));
        assert_eq!(page.offset(), 0);

        let page = Page::from_query(Some(1), Some(200));
        assert_eq!(page.limit(), MAX_PAGE_SIZE);

        let page = Page::from_query(Some(1), Some(-5));
        assert_eq!(page.limit(), 1);
    }

    #[test]
    fn test_offset_calculation() {
        assert_eq!(Page::from_query(Some(2), Some(20)).offset(), 20);
        assert_eq!(Page::from_query(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn test_response_meta_first_page() {
        let resp = PaginatedResponse::new(vec![0; 20], Page::from_query(Some(1), Some(20)), 100);
        assert_eq!(resp.pagination.total_pages, 5);
        assert!(resp.pagination.has_next_page);
        assert!(!resp.pagination.has_previous_page);
    }

    #[test]
    fn test_response_meta_last_page() {
        let resp = PaginatedResponse::new(vec![0; 20], Page::from_query(Some(5), Some(20)), 100);
        assert!(!resp.pagination.has_next_page);
        assert!(resp.pagination.has_previous_page);
    }

    #[test]
    fn test_response_meta_partial_page() {
        let resp = PaginatedResponse::new(vec![0; 15], Page::from_query(Some(1), Some(20)), 15);
        assert_eq!(resp.pagination.total_pages, 1);
        assert!(!resp.pagination.has_next_page);
    }
}
