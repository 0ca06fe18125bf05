//! In-process cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use userdir_core::UserdirResult;

/// Entry bound used by [`InMemoryCache::new`].
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Clone)]
struct Entry {
    value: Arc<[u8]>,
    ttl: Duration,
}

/// Gives every entry the TTL it was written with. Reads keep the remaining
/// lifetime; overwrites restart it.
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Bounded process-local cache with per-entry expiry.
///
/// Once `max_entries` is reached moka evicts by its TinyLFU policy, so a
/// long-running process holds at most that many keys.
#[derive(Clone)]
pub struct InMemoryCache {
    entries: Cache<String, Entry>,
}

impl InMemoryCache {
    /// Creates a cache holding at most [`DEFAULT_MAX_ENTRIES`] keys.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Creates a cache holding at most `max_entries` keys.
    #[must_use]
    pub fn with_capacity(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryExpiry)
            .build();
        Self { entries }
    }

    /// Number of live entries, after pending evictions are applied.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Returns true if no live entries remain.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get(&self, key: &str) -> UserdirResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).await.map(|entry| entry.value.to_vec()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> UserdirResult<()> {
        let entry = Entry {
            value: Arc::from(value),
            ttl,
        };
        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> UserdirResult<bool> {
        Ok(self.entries.remove(key).await.is_some())
    }
}
