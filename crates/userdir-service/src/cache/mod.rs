//! Caching infrastructure for the service layer.
//!
//! [`CacheInterface`] is the raw byte store; [`CacheCoordinator`] owns key
//! derivation, payload encoding and the rule that cache faults never fail
//! a request.

mod cache_interface;
pub mod cache_keys;
mod coordinator;
mod memory_cache;
mod redis_cache;

pub use cache_interface::CacheInterface;
#[cfg(test)]
pub use cache_interface::MockCacheInterface;
pub use coordinator::{CacheCoordinator, ListSweepPolicy};
pub use memory_cache::InMemoryCache;
pub use redis_cache::{RedisCache, DEFAULT_TTL};
