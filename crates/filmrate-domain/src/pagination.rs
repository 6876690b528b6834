//! Pagination and sort direction types.

use serde::{Deserialize, Serialize};

/// Default page size when the caller sends none.
pub const DEFAULT_LIMIT: u32 = 20;

/// Hard ceiling on page size.
pub const MAX_LIMIT: u32 = 100;

/// Generic sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sort {
    Desc,
    Asc,
}

/// Pagination parameters shared across all list endpoints.
///
/// - `limit`: 1–`MAX_LIMIT`, default 20
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Clamp `limit` to 1–`MAX_LIMIT` and `page` to ≥ 1.
    pub fn clamped(self) -> Self {
        self.clamped_to(MAX_LIMIT)
    }

    /// Clamp `limit` to 1–`max_limit` and `page` to ≥ 1.
    pub fn clamped_to(self, max_limit: u32) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, max_limit.max(1)),
        }
    }

    /// Number of rows to skip. Assumes the request is already clamped.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Pagination block attached to every paginated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: PageRequest, total: u64) -> Self {
        let limit = u64::from(page.limit.max(1));
        Self {
            page: page.page,
            limit: page.limit,
            total,
            pages: total.div_ceil(limit),
        }
    }
}

/// A page of items together with its pagination block.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: PageRequest, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(page, total),
        }
    }
}
