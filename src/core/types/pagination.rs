//! Paginated response envelope

use serde::{Deserialize, Serialize};

/// One page of items as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PaginatedResponse<T> {
    /// Build a page whose navigation flags follow from `page` and `total_pages`
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32, total_pages: u32) -> Self {
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Check `has_next == page < total_pages`, `has_prev == page > 1`
    /// and `items.len() <= limit`
    pub fn is_consistent(&self) -> bool {
        self.has_next == (self.page < self.total_pages)
            && self.has_prev == (self.page > 1)
            && self.items.len() <= self.limit as usize
    }
}
