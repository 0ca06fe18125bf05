//! # Userdir Core
//!
//! Core types, traits, and error definitions for the userdir service.
//! Every other crate in the workspace builds on the record type, the
//! unified error and the pagination rules defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use validation::*;
