//! PostgreSQL user store implementation.

use crate::{traits::UserStore, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, error, info};
use userdir_core::{User, UserId, UserdirError, UserdirResult};
use uuid::Uuid;

/// PostgreSQL user store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: Arc<DatabasePool>,
}

impl PgUserStore {
    /// Creates a new PostgreSQL user store.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    age: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from(row.id),
            name: row.name,
            email: row.email,
            age: row.age,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Classifies a failed write, turning the unique email index into a conflict.
fn write_error(err: sqlx::Error, user: &User) -> UserdirError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return UserdirError::duplicate_email(&user.email);
        }
    }
    error!(user_id = %user.id, user_email = %user.email, error = %err, "Database write failed");
    UserdirError::from(err)
}

fn record_uuid(id: &UserId) -> UserdirResult<Uuid> {
    id.as_uuid()
        .ok_or_else(|| UserdirError::internal(format!("user id {id} is not a UUID")))
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &User) -> UserdirResult<User> {
        debug!(user_id = %user.id, user_email = %user.email, "Creating user");

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, age, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, age, created_at, updated_at
            "#,
        )
        .bind(record_uuid(&user.id)?)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| write_error(e, user))?;

        info!(user_id = %row.id, user_email = %row.email, "User created in database");
        Ok(row.into())
    }

    async fn get_by_id(&self, id: &UserId) -> UserdirResult<Option<User>> {
        let Some(uuid) = id.as_uuid() else {
            debug!(user_id = %id, "Malformed user id treated as not found");
            return Ok(None);
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, age, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn update(&self, user: &User) -> UserdirResult<User> {
        debug!(user_id = %user.id, user_email = %user.email, "Updating user");

        let Some(uuid) = user.id.as_uuid() else {
            return Err(UserdirError::not_found("User", &user.id));
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $2, email = $3, age = $4, updated_at = $5
            WHERE id = $1
            RETURNING id, name, email, age, created_at, updated_at
            "#,
        )
        .bind(uuid)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(user.updated_at)
        .fetch_optional(self.pool.inner())
        .await
        .map_err(|e| write_error(e, user))?;

        row.map(User::from)
            .ok_or_else(|| UserdirError::not_found("User", &user.id))
    }

    async fn delete(&self, id: &UserId) -> UserdirResult<bool> {
        let Some(uuid) = id.as_uuid() else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(uuid)
            .execute(self.pool.inner())
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(user_id = %id, "User deleted from database");
        }
        Ok(deleted)
    }

    async fn list(&self, offset: u64, limit: u32) -> UserdirResult<(Vec<User>, u64)> {
        debug!(offset, limit, "Listing users");

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.inner())
            .await?;

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, age, created_at, updated_at
            FROM users
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(limit))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(self.pool.inner())
        .await?;

        let users = rows.into_iter().map(User::from).collect();
        Ok((users, u64::try_from(total).unwrap_or_default()))
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<&UserId>) -> UserdirResult<bool> {
        let exclude = exclude_id.and_then(UserId::as_uuid);

        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(exists)
    }
}
