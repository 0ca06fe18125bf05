//! Result type aliases for userdir.

use crate::UserdirError;

/// A specialized `Result` type for userdir operations.
pub type UserdirResult<T> = Result<T, UserdirError>;
