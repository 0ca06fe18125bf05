//! Record store trait definitions.

use async_trait::async_trait;
use userdir_core::{User, UserId, UserdirResult};

/// Durable storage for user records.
///
/// Implementations enforce email uniqueness atomically and report a
/// collision as [`UserdirError::Conflict`](userdir_core::UserdirError::Conflict).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new record.
    async fn create(&self, user: &User) -> UserdirResult<User>;

    /// Finds a record by ID. Unknown or malformed IDs yield `None`.
    async fn get_by_id(&self, id: &UserId) -> UserdirResult<Option<User>>;

    /// Overwrites an existing record, matched by ID.
    ///
    /// Fails with `NotFound` if the record vanished and `Conflict` if the
    /// new email belongs to another record.
    async fn update(&self, user: &User) -> UserdirResult<User>;

    /// Deletes a record. Returns false if nothing was deleted.
    async fn delete(&self, id: &UserId) -> UserdirResult<bool>;

    /// Returns one slice of records, newest first, and the total count.
    async fn list(&self, offset: u64, limit: u32) -> UserdirResult<(Vec<User>, u64)>;

    /// Checks whether another record already uses `email`.
    async fn email_exists(&self, email: &str, exclude_id: Option<&UserId>) -> UserdirResult<bool>;
}
