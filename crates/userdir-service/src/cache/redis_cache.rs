//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, PoolConfig, Runtime};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use userdir_config::CacheConfig;
use userdir_core::{UserdirError, UserdirResult};

/// Default TTL for cached items (15 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(900);

/// Redis-based cache.
pub struct RedisCache {
    /// Redis connection pool; `None` when caching is disabled.
    pool: Option<Arc<Pool>>,
}

impl RedisCache {
    /// Create a new Redis cache over an existing pool.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Build the connection pool described by `config`.
    ///
    /// Connections are opened lazily, so an unreachable server surfaces
    /// as cache errors on first use rather than here.
    pub fn from_config(config: &CacheConfig) -> UserdirResult<Self> {
        if !config.enabled {
            info!("Cache disabled by configuration");
            return Ok(Self::disabled());
        }

        let mut pool_config = Config::from_url(config.url.clone());
        pool_config.pool = Some(PoolConfig::new(config.pool_size as usize));
        let pool = pool_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| UserdirError::Cache(format!("Failed to create Redis pool: {}", e)))?;

        info!(pool_size = config.pool_size, "Redis cache pool created");
        Ok(Self::new(Arc::new(pool)))
    }

    /// Create a no-op cache (for when Redis is disabled).
    ///
    /// Every lookup misses and every write is dropped.
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    async fn get_conn(&self) -> UserdirResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                UserdirError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(UserdirError::Cache("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl CacheInterface for RedisCache {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get(&self, key: &str) -> UserdirResult<Option<Vec<u8>>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(|e| {
            UserdirError::Cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> UserdirResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await.map_err(|e| {
            UserdirError::Cache(format!("Failed to set key '{}': {}", key, e))
        })?;

        debug!(cache_key = key, ttl_secs, "Cached key");
        Ok(())
    }

    async fn delete(&self, key: &str) -> UserdirResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| {
            UserdirError::Cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let cache = RedisCache::disabled();
        assert!(!cache.is_enabled());

        cache.set("k", b"v", DEFAULT_TTL).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(!cache.delete("k").await.unwrap());
    }

    #[test]
    fn test_from_config_respects_enabled_flag() {
        let config = CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        };
        let cache = RedisCache::from_config(&config).unwrap();
        assert!(!cache.is_enabled());
    }

    #[test]
    fn test_default_ttl_matches_config() {
        assert_eq!(CacheConfig::default().default_ttl(), DEFAULT_TTL);
    }

    #[tokio::test]
    async fn test_from_config_builds_lazy_pool() {
        let cache = RedisCache::from_config(&CacheConfig::default()).unwrap();
        assert!(cache.is_enabled());
    }
}
