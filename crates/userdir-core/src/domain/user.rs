//! User record.

use crate::UserId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A user record as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier assigned at creation, never reassigned.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, unique across the store.
    pub email: String,
    /// Age in whole years.
    pub age: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a fresh identifier.
    ///
    /// Name and email are trimmed and the email is lowercased, so two
    /// addresses differing only in case collide on uniqueness.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i32) -> Self {
        let now = now();
        Self {
            id: UserId::generate(),
            name: name.into().trim().to_string(),
            email: normalize_email(&email.into()),
            age,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update. `None` leaves the field unchanged.
    ///
    /// `updated_at` is refreshed even when no field changed.
    pub fn apply_update(&mut self, name: Option<&str>, email: Option<&str>, age: Option<i32>) {
        if let Some(name) = name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = email {
            self.email = normalize_email(email);
        }
        if let Some(age) = age {
            self.age = age;
        }
        self.updated_at = now().max(self.created_at);
    }
}

/// Canonical form used for storage and uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// Postgres keeps microseconds; truncate so a stored record compares equal
// to the one we built.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
