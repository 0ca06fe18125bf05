//! User service implementation.

use crate::cache::CacheCoordinator;
use crate::dto::{CreateUserRequest, UpdateUserRequest, UserListResponse, UserResponse};
use crate::user_service::UserService;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};
use userdir_core::{
    normalize_email, require_id, Page, PageRequest, User, UserId, UserdirError, UserdirResult,
    ValidateExt,
};
use userdir_repository::UserStore;

/// User service backed by a record store with a coordinated cache in front.
///
/// Writes hit the store first; cache steps run only after the store call
/// succeeded, so a failed write never touches the cache.
pub struct UserServiceImpl {
    store: Arc<dyn UserStore>,
    cache: CacheCoordinator,
}

impl UserServiceImpl {
    /// Creates a new user service.
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, cache: CacheCoordinator) -> Self {
        Self { store, cache }
    }

    /// Refreshes the entity entry and drops the swept list windows.
    async fn publish_write(&self, user: &User) {
        self.cache
            .store(&CacheCoordinator::entity_key(&user.id), user)
            .await;
        self.cache.sweep_lists().await;
    }
}

fn log_store_error(op: &'static str, user_id: Option<&UserId>, err: &UserdirError) {
    if !err.is_client_error() {
        error!(user_id = ?user_id.map(UserId::as_str), error = %err, "Store {} failed", op);
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn create_user(&self, request: CreateUserRequest) -> UserdirResult<UserResponse> {
        debug!(user_email = %request.email, "Creating user");

        request.validate_request()?;

        let user = User::new(request.name, request.email, request.age);
        let created = self.store.create(&user).await.inspect_err(|e| {
            log_store_error("create", Some(&user.id), e);
        })?;

        self.publish_write(&created).await;

        info!(user_id = %created.id, user_email = %created.email, "User created");
        Ok(UserResponse::from(created))
    }

    async fn get_user(&self, id: &UserId) -> UserdirResult<UserResponse> {
        require_id(id)?;
        let id = &id.canonical();

        let key = CacheCoordinator::entity_key(id);
        if let Some(user) = self.cache.fetch::<User>(&key).await {
            debug!(user_id = %id, "User served from cache");
            return Ok(UserResponse::from(user));
        }

        let user = self
            .store
            .get_by_id(id)
            .await
            .inspect_err(|e| log_store_error("get", Some(id), e))?
            .ok_or_else(|| UserdirError::not_found("User", id))?;

        self.cache.store(&key, &user).await;

        debug!(user_id = %id, "User loaded from store");
        Ok(UserResponse::from(user))
    }

    async fn update_user(&self, id: &UserId, request: UpdateUserRequest) -> UserdirResult<UserResponse> {
        require_id(id)?;
        let id = &id.canonical();

        let request = request.normalized();
        request.validate_request()?;

        // Current state comes from the store, never from the cache.
        let mut user = self
            .store
            .get_by_id(id)
            .await
            .inspect_err(|e| log_store_error("get", Some(id), e))?
            .ok_or_else(|| UserdirError::not_found("User", id))?;

        if let Some(email) = request.email.as_deref() {
            let email = normalize_email(email);
            let taken = email != user.email
                && self
                    .store
                    .email_exists(&email, Some(id))
                    .await
                    .inspect_err(|e| log_store_error("email_exists", Some(id), e))?;
            if taken {
                debug!(user_id = %id, user_email = %email, "Email already taken");
                return Err(UserdirError::duplicate_email(&email));
            }
        }

        user.apply_update(
            request.name.as_deref(),
            request.email.as_deref(),
            request.age,
        );

        let updated = self
            .store
            .update(&user)
            .await
            .inspect_err(|e| log_store_error("update", Some(id), e))?;

        self.publish_write(&updated).await;

        info!(user_id = %id, user_email = %updated.email, "User updated");
        Ok(UserResponse::from(updated))
    }

    async fn delete_user(&self, id: &UserId) -> UserdirResult<()> {
        require_id(id)?;
        let id = &id.canonical();

        let deleted = self
            .store
            .delete(id)
            .await
            .inspect_err(|e| log_store_error("delete", Some(id), e))?;
        if !deleted {
            return Err(UserdirError::not_found("User", id));
        }

        self.cache.evict(&CacheCoordinator::entity_key(id)).await;
        self.cache.sweep_lists().await;

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn list_users(&self, page: PageRequest) -> UserdirResult<UserListResponse> {
        let offset = page.offset();
        let limit = page.limit();
        let key = CacheCoordinator::list_key(offset, limit);

        if let Some(cached) = self.cache.fetch::<UserListResponse>(&key).await {
            debug!(offset, limit, total = cached.total, "User list served from cache");
            return Ok(cached);
        }

        let (users, total) = self
            .store
            .list(offset, limit)
            .await
            .inspect_err(|e| log_store_error("list", None, e))?;

        let response = UserListResponse::from(Page::new(users, page, total));
        self.cache.store(&key, &response).await;

        debug!(
            offset,
            limit,
            total,
            returned = response.users.len(),
            "User list loaded from store"
        );
        Ok(response)
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
