//! # Userdir Config
//!
//! Configuration management for the userdir service.
//! Supports layered configuration from files and environment variables,
//! validated once at load time.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
