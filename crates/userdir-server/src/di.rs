//! Dependency wiring.
//!
//! Components are built once at startup from [`AppConfig`] and handed to
//! their consumers through constructors. The store and cache backends are
//! picked by `store.backend` and `cache.backend`.

use std::sync::Arc;
use tracing::info;
use userdir_config::{AppConfig, CacheBackend, CacheConfig, StoreBackend};
use userdir_core::UserdirResult;
use userdir_repository::{create_pool, DatabasePool, InMemoryUserStore, PgUserStore, UserStore};
use userdir_service::{
    CacheCoordinator, CacheInterface, InMemoryCache, RedisCache, UserService, UserServiceImpl,
};

/// Fully wired application components.
pub struct AppModule {
    user_service: Arc<dyn UserService>,
    db_pool: Option<Arc<DatabasePool>>,
}

impl AppModule {
    /// Resolves the user service.
    #[must_use]
    pub fn user_service(&self) -> Arc<dyn UserService> {
        Arc::clone(&self.user_service)
    }

    /// Database pool, when the relational store is in use.
    #[must_use]
    pub fn db_pool(&self) -> Option<&Arc<DatabasePool>> {
        self.db_pool.as_ref()
    }

    /// Releases pooled connections.
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.db_pool {
            pool.close().await;
        }
    }
}

/// Builds every component the server needs.
pub async fn build_app_module(config: &AppConfig) -> UserdirResult<AppModule> {
    let (store, db_pool) = build_store(config).await?;
    let cache = build_cache(&config.cache)?;
    let coordinator = CacheCoordinator::from_config(cache, &config.cache)?;

    info!(
        store = ?config.store.backend,
        cache = ?config.cache.backend,
        cache_enabled = config.cache.enabled,
        sweep_windows = coordinator.sweep_policy().window_count(),
        "Components wired"
    );

    let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(store, coordinator));

    Ok(AppModule {
        user_service,
        db_pool,
    })
}

async fn build_store(
    config: &AppConfig,
) -> UserdirResult<(Arc<dyn UserStore>, Option<Arc<DatabasePool>>)> {
    match config.store.backend {
        StoreBackend::Postgres => {
            let pool = create_pool(&config.database).await?;
            pool.health_check().await?;
            let store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(Arc::clone(&pool)));
            Ok((store, Some(pool)))
        }
        StoreBackend::Memory => Ok((Arc::new(InMemoryUserStore::new()), None)),
    }
}

fn build_cache(config: &CacheConfig) -> UserdirResult<Arc<dyn CacheInterface>> {
    if !config.enabled {
        return Ok(Arc::new(RedisCache::disabled()));
    }

    Ok(match config.backend {
        CacheBackend::Redis => Arc::new(RedisCache::from_config(config)?),
        CacheBackend::Memory => Arc::new(InMemoryCache::with_capacity(config.memory_max_entries)),
    })
}
