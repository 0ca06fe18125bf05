//! User service trait definition.

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserListResponse, UserResponse};
use async_trait::async_trait;
use userdir_core::{PageRequest, UserId, UserdirResult};

/// User service trait.
///
/// Single-record reads observe every write that returned before them.
/// List reads may lag by up to the cache TTL for page windows outside the
/// sweep policy.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Creates a new user.
    async fn create_user(&self, request: CreateUserRequest) -> UserdirResult<UserResponse>;

    /// Gets a user by ID.
    async fn get_user(&self, id: &UserId) -> UserdirResult<UserResponse>;

    /// Applies a partial update to a user.
    async fn update_user(&self, id: &UserId, request: UpdateUserRequest) -> UserdirResult<UserResponse>;

    /// Deletes a user.
    async fn delete_user(&self, id: &UserId) -> UserdirResult<()>;

    /// Lists users, newest first.
    async fn list_users(&self, page: PageRequest) -> UserdirResult<UserListResponse>;
}
