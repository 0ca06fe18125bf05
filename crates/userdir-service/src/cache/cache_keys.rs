//! Cache key generators for consistent key naming.

use userdir_core::UserId;

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "userdir";

/// Generate a cache key for a user by ID.
#[must_use]
pub fn user_by_id(id: &UserId) -> String {
    format!("{}:user:{}", CACHE_PREFIX, id)
}

/// Generate a cache key for one page window of the user list.
#[must_use]
pub fn user_list(offset: u64, limit: u32) -> String {
    format!("{}:users:list:{}:{}", CACHE_PREFIX, offset, limit)
}
