//! In-memory user store.

use crate::traits::UserStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use userdir_core::{User, UserId, UserdirError, UserdirResult};

/// Process-local store backed by a map.
///
/// Every mutation runs under one write lock, which makes the email
/// uniqueness check and the insert a single atomic step.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Returns true if no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

fn email_taken(users: &HashMap<UserId, User>, email: &str, exclude_id: Option<&UserId>) -> bool {
    users
        .values()
        .any(|u| u.email == email && Some(&u.id) != exclude_id)
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: &User) -> UserdirResult<User> {
        let mut users = self.users.write();
        if email_taken(&users, &user.email, None) {
            return Err(UserdirError::duplicate_email(&user.email));
        }
        if users.contains_key(&user.id) {
            return Err(UserdirError::conflict(format!("user {} already exists", user.id)));
        }
        users.insert(user.id.clone(), user.clone());
        debug!(user_id = %user.id, user_email = %user.email, "User stored in memory");
        Ok(user.clone())
    }

    async fn get_by_id(&self, id: &UserId) -> UserdirResult<Option<User>> {
        Ok(self.users.read().get(id).cloned())
    }

    async fn update(&self, user: &User) -> UserdirResult<User> {
        let mut users = self.users.write();
        if !users.contains_key(&user.id) {
            return Err(UserdirError::not_found("User", &user.id));
        }
        if email_taken(&users, &user.email, Some(&user.id)) {
            return Err(UserdirError::duplicate_email(&user.email));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> UserdirResult<bool> {
        Ok(self.users.write().remove(id).is_some())
    }

    async fn list(&self, offset: u64, limit: u32) -> UserdirResult<(Vec<User>, u64)> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = users.len() as u64;
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        let page = users
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<&UserId>) -> UserdirResult<bool> {
        Ok(email_taken(&self.users.read(), email, exclude_id))
    }
}
