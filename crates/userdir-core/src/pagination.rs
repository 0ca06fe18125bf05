//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// A normalized request for a page of results.
///
/// Pages are 1-indexed. Construction never fails: out-of-range input is
/// pulled back into bounds instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub limit: u32,
}

impl PageRequest {
    /// The smallest allowed page size.
    pub const MIN_LIMIT: u32 = 1;
    /// The maximum allowed page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Creates a page request from raw client values.
    ///
    /// `page` below 1 becomes 1; `limit` is clamped into
    /// [`MIN_LIMIT`](Self::MIN_LIMIT)..=[`MAX_LIMIT`](Self::MAX_LIMIT).
    #[must_use]
    pub fn new(page: i32, limit: i32) -> Self {
        let page = u32::try_from(page.max(1)).unwrap_or(1);
        let limit = u32::try_from(limit.clamp(1, 100)).unwrap_or(Self::MIN_LIMIT);
        Self { page, limit }
    }

    /// Returns the offset for store queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    /// Returns the limit for store queries.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Information about a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// The current page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub limit: u32,
    /// The total number of items across all pages.
    pub total: u64,
    /// The total number of pages.
    pub total_pages: u64,
}

impl PageInfo {
    /// Creates a new page info.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(u64::from(request.limit)),
        }
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub content: Vec<T>,
    /// Information about this page.
    #[serde(flatten)]
    pub info: PageInfo,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(content: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            content,
            info: PageInfo::new(request, total),
        }
    }
}
