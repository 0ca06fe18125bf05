//! # Userdir Service
//!
//! Record service and the cache coordination layer in front of the store.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::UserServiceImpl;
pub use user_service::*;
