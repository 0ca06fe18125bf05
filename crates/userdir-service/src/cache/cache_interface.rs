//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use std::time::Duration;
use userdir_core::UserdirResult;

/// Key-value cache with per-key expiry.
///
/// Values are opaque bytes; encoding belongs to the caller. A missing or
/// expired key is `Ok(None)`, distinct from a backend failure, which is
/// `Err(UserdirError::Cache)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheInterface: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> UserdirResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> UserdirResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> UserdirResult<bool>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}
