//! User-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use userdir_core::{Page, User, UserId};
use validator::Validate;

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(custom(function = userdir_core::rules::valid_name))]
    pub name: String,

    #[validate(custom(function = userdir_core::rules::valid_email))]
    pub email: String,

    #[validate(range(min = 1, max = 149, message = "age must be between 1 and 149"))]
    pub age: i32,
}

/// Partial update of a user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(custom(function = userdir_core::rules::valid_name))]
    pub name: Option<String>,

    #[validate(custom(function = userdir_core::rules::valid_email))]
    pub email: Option<String>,

    #[validate(range(min = 1, max = 149, message = "age must be between 1 and 149"))]
    pub age: Option<i32>,
}

impl UpdateUserRequest {
    /// Treats empty strings and a zero age as "not provided".
    ///
    /// Proto3 scalars carry no presence, so transports forward these defaults
    /// verbatim for untouched fields and the service folds them here.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.filter(|s| !s.is_empty()),
            email: self.email.filter(|s| !s.is_empty()),
            age: self.age.filter(|&a| a != 0),
        }
    }
}

/// User response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// One page of users. This is also the payload cached under a list key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl UserListResponse {
    /// Human-readable summary, e.g. "Retrieved 3 users (page 1)".
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Retrieved {} users (page {})", self.users.len(), self.page)
    }
}

impl From<Page<User>> for UserListResponse {
    fn from(page: Page<User>) -> Self {
        let info = page.info;
        Self {
            users: page.content.into_iter().map(UserResponse::from).collect(),
            page: info.page,
            limit: info.limit,
            total: info.total,
            total_pages: info.total_pages,
        }
    }
}
