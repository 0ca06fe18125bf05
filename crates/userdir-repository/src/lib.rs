//! # Userdir Repository
//!
//! Record store contract and its implementations:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserStore>
//! PgUserStore | InMemoryUserStore
//!   ↓
//! PostgreSQL (sqlx)   HashMap behind a lock
//! ```

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod traits;

pub use memory::InMemoryUserStore;
pub use pool::*;
pub use postgres::PgUserStore;
pub use traits::*;
