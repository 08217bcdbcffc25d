//! Paged listing types

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Page query from the query string (`?page=2&page_size=20`)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// True when the caller asked for paging at all
    pub fn is_paged(&self) -> bool {
        self.page.is_some() || self.page_size.is_some()
    }

    /// Clamp to usable values: page ≤ 0 → 1, page_size ≤ 0 → 10
    pub fn normalize(&self) -> (i64, i64) {
        let page = match self.page {
            Some(p) if p > 0 => p,
            _ => DEFAULT_PAGE,
        };
        let page_size = match self.page_size {
            Some(s) if s > 0 => s,
            _ => DEFAULT_PAGE_SIZE,
        };
        (page, page_size)
    }

    /// Row offset for a normalized page
    pub fn offset(page: i64, page_size: i64) -> i64 {
        (page - 1).saturating_mul(page_size)
    }
}

/// One page of results with the counts needed to page further
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total_count: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            total_count / page_size + i64::from(total_count % page_size > 0)
        } else {
            1
        };

        Self {
            items,
            total_count,
            page,
            page_size,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults() {
        assert_eq!(PageQuery::default().normalize(), (1, 10));
        assert_eq!(PageQuery::new(0, -5).normalize(), (1, 10));
        assert_eq!(PageQuery::new(3, 25).normalize(), (3, 25));
    }

    #[test]
    fn test_is_paged() {
        assert!(!PageQuery::default().is_paged());
        assert!(PageQuery { page: Some(1), page_size: None }.is_paged());
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageQuery::offset(1, 10), 0);
        assert_eq!(PageQuery::offset(4, 10), 30);
    }

    #[test]
    fn test_paginated_response() {
        let items = vec!["a", "b", "c"];
        let resp = PaginatedResponse::new(items, 100, 2, 10);

        assert_eq!(resp.total_count, 100);
        assert_eq!(resp.page, 2);
        assert_eq!(resp.total_pages, 10);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let resp = PaginatedResponse::<u8>::new(vec![], 21, 1, 10);
        assert_eq!(resp.total_pages, 3);

        let empty = PaginatedResponse::<u8>::new(vec![], 0, 1, 10);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_total_pages_with_huge_page_size() {
        let resp = PaginatedResponse::<u8>::new(vec![], 2, 1, i64::MAX);
        assert_eq!(resp.total_pages, 1);

        let resp = PaginatedResponse::<u8>::new(vec![], i64::MAX, 1, i64::MAX);
        assert_eq!(resp.total_pages, 1);

        let resp = PaginatedResponse::<u8>::new(vec![], i64::MAX, 1, 1);
        assert_eq!(resp.total_pages, i64::MAX);
    }
}
