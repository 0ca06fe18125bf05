//! Cache coordination between the record service and the cache.
//!
//! Every cache call made on behalf of a request goes through
//! [`CacheCoordinator`]. It derives keys, encodes payloads with one serde
//! codec, bounds each call with a timeout and downgrades every cache fault
//! to a logged warning. Callers only ever see a hit, a miss, or nothing.

use super::{cache_keys, CacheInterface};
use futures::future::join_all;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use userdir_config::CacheConfig;
use userdir_core::{UserId, UserdirError, UserdirResult};

/// The set of list windows proactively deleted after each write.
///
/// List entries are keyed by `(offset, limit)`, so a write can affect any
/// number of them. The sweep deletes the first `pages` pages for each of
/// `limits` and leaves every other window to expire by TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSweepPolicy {
    limits: Vec<u32>,
    pages: u32,
}

impl ListSweepPolicy {
    /// Hard cap on keys touched by one sweep.
    pub const MAX_WINDOWS: usize = CacheConfig::MAX_SWEEP_WINDOWS;

    /// Creates a sweep policy.
    ///
    /// Rejects limits outside `1..=100`, an empty sweep, and sweeps wider
    /// than [`MAX_WINDOWS`](Self::MAX_WINDOWS).
    pub fn new(limits: Vec<u32>, pages: u32) -> UserdirResult<Self> {
        if let Some(bad) = limits
            .iter()
            .find(|&&l| l == 0 || l > CacheConfig::MAX_PAGE_LIMIT)
        {
            return Err(UserdirError::Configuration(format!(
                "list sweep limit {bad} is outside 1-{}",
                CacheConfig::MAX_PAGE_LIMIT
            )));
        }

        let policy = Self { limits, pages };
        let windows = policy.window_count();
        if windows == 0 || windows > Self::MAX_WINDOWS {
            return Err(UserdirError::Configuration(format!(
                "list sweep covers {windows} windows, expected 1-{}",
                Self::MAX_WINDOWS
            )));
        }
        Ok(policy)
    }

    /// Builds the policy from the cache section of the configuration.
    pub fn from_config(config: &CacheConfig) -> UserdirResult<Self> {
        Self::new(config.list_sweep_limits.clone(), config.list_sweep_pages)
    }

    /// Number of list keys one sweep deletes.
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.limits.len().saturating_mul(self.pages as usize)
    }

    /// Enumerates the swept `(offset, limit)` windows.
    pub fn windows(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.limits.iter().flat_map(move |&limit| {
            (0..u64::from(self.pages)).map(move |page| (page * u64::from(limit), limit))
        })
    }
}

impl Default for ListSweepPolicy {
    fn default() -> Self {
        Self {
            limits: vec![10, 20, 50, 100],
            pages: 10,
        }
    }
}

/// Read-through/write-through coordinator over a [`CacheInterface`].
#[derive(Clone)]
pub struct CacheCoordinator {
    cache: Arc<dyn CacheInterface>,
    ttl: Duration,
    operation_timeout: Duration,
    sweep: ListSweepPolicy,
}

impl CacheCoordinator {
    /// Creates a coordinator.
    #[must_use]
    pub fn new(
        cache: Arc<dyn CacheInterface>,
        ttl: Duration,
        operation_timeout: Duration,
        sweep: ListSweepPolicy,
    ) -> Self {
        Self {
            cache,
            ttl,
            operation_timeout,
            sweep,
        }
    }

    /// Creates a coordinator from the cache section of the configuration.
    pub fn from_config(cache: Arc<dyn CacheInterface>, config: &CacheConfig) -> UserdirResult<Self> {
        Ok(Self::new(
            cache,
            config.default_ttl(),
            config.operation_timeout(),
            ListSweepPolicy::from_config(config)?,
        ))
    }

    /// Key of the entry holding one record.
    #[must_use]
    pub fn entity_key(id: &UserId) -> String {
        cache_keys::user_by_id(id)
    }

    /// Key of the entry holding one list page.
    #[must_use]
    pub fn list_key(offset: u64, limit: u32) -> String {
        cache_keys::user_list(offset, limit)
    }

    /// Encodes a cache payload.
    pub fn encode<T: Serialize>(value: &T) -> UserdirResult<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Decodes a cache payload.
    pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> UserdirResult<T> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Entry lifetime applied to every write.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The active sweep policy.
    #[must_use]
    pub const fn sweep_policy(&self) -> &ListSweepPolicy {
        &self.sweep
    }

    /// Runs one cache call under the operation timeout.
    ///
    /// Both timeouts and backend errors are logged and collapsed to `None`.
    async fn guarded<T, F>(&self, op: &'static str, key: &str, call: F) -> Option<T>
    where
        F: Future<Output = UserdirResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!(cache_key = key, error = %e, "Cache {} failed", op);
                None
            }
            Err(_) => {
                warn!(
                    cache_key = key,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "Cache {} timed out",
                    op
                );
                None
            }
        }
    }

    /// Read-through lookup.
    ///
    /// Returns `None` on a miss, on any cache failure, and on a payload that
    /// no longer decodes. The caller falls back to the store in all three.
    pub async fn fetch<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.guarded("get", key, self.cache.get(key)).await.flatten()?;
        match Self::decode(&bytes) {
            Ok(value) => {
                debug!(cache_key = key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(cache_key = key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Write-through population or refresh. Failures are swallowed.
    pub async fn store<T: Serialize>(&self, key: &str, value: &T) {
        let bytes = match Self::encode(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(cache_key = key, error = %e, "Failed to encode cache entry");
                return;
            }
        };

        if self
            .guarded("set", key, self.cache.set(key, &bytes, self.ttl))
            .await
            .is_some()
        {
            debug!(cache_key = key, ttl_secs = self.ttl.as_secs(), "Cache entry written");
        }
    }

    /// Deletes one entry. Failures are swallowed.
    pub async fn evict(&self, key: &str) {
        if let Some(existed) = self.guarded("delete", key, self.cache.delete(key)).await {
            debug!(cache_key = key, existed, "Cache entry evicted");
        }
    }

    /// Deletes every list window named by the sweep policy.
    ///
    /// Returns how many keys actually existed. Deletes run concurrently and
    /// each is individually bounded by the operation timeout.
    pub async fn sweep_lists(&self) -> usize {
        let keys: Vec<String> = self
            .sweep
            .windows()
            .map(|(offset, limit)| Self::list_key(offset, limit))
            .collect();

        let deletes = keys
            .iter()
            .map(|key| self.guarded("delete", key, self.cache.delete(key)));
        let removed = join_all(deletes)
            .await
            .into_iter()
            .filter(|r| matches!(r, Some(true)))
            .count();

        debug!(
            windows = keys.len(),
            invalidated_entries = removed,
            "List cache invalidation completed"
        );
        removed
    }
}

impl std::fmt::Debug for CacheCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheCoordinator")
            .field("enabled", &self.cache.is_enabled())
            .field("ttl", &self.ttl)
            .field("operation_timeout", &self.operation_timeout)
            .field("sweep_windows", &self.sweep.window_count())
            .finish()
    }
}
