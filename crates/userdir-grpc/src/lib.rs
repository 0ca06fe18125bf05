//! # Userdir gRPC
//!
//! Tonic transport for the user directory: the `userdir.user.v1.UserService`
//! endpoints, the standard health service and the server that hosts them.

pub mod proto;
pub mod server;
pub mod services;

pub use server::*;
pub use services::*;

#[cfg(test)]
mod tests {
    use super::proto::user;
    use super::services::{to_status, UserGrpcService};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tonic::{Code, Request};
    use userdir_core::{Page, PageRequest, User, UserId, UserdirError, UserdirResult};
    use userdir_service::{
        CreateUserRequest, UpdateUserRequest, UserListResponse, UserResponse, UserService,
    };

    // =============================================================================
    // Test Fixtures and Mocks
    // =============================================================================

    /// Mock user service for gRPC tests.
    #[derive(Default)]
    struct MockUserService {
        users: Mutex<HashMap<UserId, User>>,
        last_update: Mutex<Option<UpdateUserRequest>>,
        fail_with_internal: bool,
    }

    impl MockUserService {
        fn with_user(user: User) -> Self {
            let service = Self::default();
            service.users.lock().insert(user.id.clone(), user);
            service
        }

        fn failing() -> Self {
            Self {
                fail_with_internal: true,
                ..Self::default()
            }
        }

        fn check(&self) -> UserdirResult<()> {
            if self.fail_with_internal {
                return Err(UserdirError::Database("connection reset by peer".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserService for MockUserService {
        async fn create_user(&self, request: CreateUserRequest) -> UserdirResult<UserResponse> {
            self.check()?;
            let mut users = self.users.lock();
            if users.values().any(|u| u.email == request.email) {
                return Err(UserdirError::duplicate_email(&request.email));
            }
            let user = User::new(request.name, request.email, request.age);
            users.insert(user.id.clone(), user.clone());
            Ok(UserResponse::from(user))
        }

        async fn get_user(&self, id: &UserId) -> UserdirResult<UserResponse> {
            self.check()?;
            if id.is_blank() {
                return Err(UserdirError::invalid_input("id", "user ID is required"));
            }
            self.users
                .lock()
                .get(id)
                .cloned()
                .map(UserResponse::from)
                .ok_or_else(|| UserdirError::not_found("User", id))
        }

        async fn update_user(
            &self,
            id: &UserId,
            request: UpdateUserRequest,
        ) -> UserdirResult<UserResponse> {
            self.check()?;
            *self.last_update.lock() = Some(request.clone());
            let request = request.normalized();
            let mut users = self.users.lock();
            let user = users
                .get_mut(id)
                .ok_or_else(|| UserdirError::not_found("User", id))?;
            user.apply_update(request.name.as_deref(), request.email.as_deref(), request.age);
            Ok(UserResponse::from(user.clone()))
        }

        async fn delete_user(&self, id: &UserId) -> UserdirResult<()> {
            self.check()?;
            self.users
                .lock()
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| UserdirError::not_found("User", id))
        }

        async fn list_users(&self, page: PageRequest) -> UserdirResult<UserListResponse> {
            self.check()?;
            let users: Vec<User> = self.users.lock().values().cloned().collect();
            let total = users.len() as u64;
            let slice = users
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap())
                .take(page.limit() as usize)
                .collect();
            Ok(UserListResponse::from(Page::new(slice, page, total)))
        }
    }

    fn alice() -> User {
        User::new("Alice", "alice@x.com", 30)
    }

    // =============================================================================
    // User gRPC Service Tests
    // =============================================================================

    #[tokio::test]
    async fn test_grpc_create_user() {
        let service = UserGrpcService::new(Arc::new(MockUserService::default()));

        let request = Request::new(user::CreateUserRequest {
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            age: 30,
        });

        let response = user::user_service_server::UserService::create_user(&service, request)
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.message, "User created successfully");
        let user = response.user.unwrap();
        assert_eq!(user.name, "Alice");
        assert_eq!(user.age, 30);
        assert!(!user.id.is_empty());
        assert!(user.created_at > 0);
    }

    #[tokio::test]
    async fn test_grpc_create_duplicate_is_already_exists() {
        let service = UserGrpcService::new(Arc::new(MockUserService::with_user(alice())));

        let request = Request::new(user::CreateUserRequest {
            name: "Other".to_string(),
            email: "alice@x.com".to_string(),
            age: 22,
        });

        let status = user::user_service_server::UserService::create_user(&service, request)
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::AlreadyExists);
        assert_eq!(status.message(), "user with email alice@x.com already exists");
    }

    #[tokio::test]
    async fn test_grpc_get_user_success() {
        let user = alice();
        let user_id = user.id.clone();
        let created_at = user.created_at.timestamp();
        let service = UserGrpcService::new(Arc::new(MockUserService::with_user(user)));

        let request = Request::new(user::GetUserRequest {
            id: user_id.to_string(),
        });

        let response = user::user_service_server::UserService::get_user(&service, request)
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.message, "User retrieved successfully");
        let user = response.user.unwrap();
        assert_eq!(user.id, user_id.as_str());
        assert_eq!(user.email, "alice@x.com");
        assert_eq!(user.created_at, created_at);
    }

    #[tokio::test]
    async fn test_grpc_get_user_not_found() {
        let service = UserGrpcService::new(Arc::new(MockUserService::default()));
        let id = UserId::generate();

        let request = Request::new(user::GetUserRequest { id: id.to_string() });

        let status = user::user_service_server::UserService::get_user(&service, request)
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), format!("user with ID {id} not found"));
    }

    #[tokio::test]
    async fn test_grpc_get_user_blank_id() {
        let service = UserGrpcService::new(Arc::new(MockUserService::default()));

        let request = Request::new(user::GetUserRequest { id: String::new() });

        let status = user::user_service_server::UserService::get_user(&service, request)
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "user ID is required");
    }

    #[tokio::test]
    async fn test_grpc_update_user_forwards_proto_defaults() {
        let user = alice();
        let user_id = user.id.clone();
        let mock = Arc::new(MockUserService::with_user(user));
        let service = UserGrpcService::new(mock.clone());

        let request = Request::new(user::UpdateUserRequest {
            id: user_id.to_string(),
            name: String::new(),
            email: String::new(),
            age: 31,
        });

        let response = user::user_service_server::UserService::update_user(&service, request)
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.message, "User updated successfully");
        let user = response.user.unwrap();
        assert_eq!(user.name, "Alice");
        assert_eq!(user.age, 31);

        let forwarded = mock.last_update.lock().clone().unwrap();
        assert_eq!(forwarded.name.as_deref(), Some(""));
        assert_eq!(forwarded.email.as_deref(), Some(""));
        assert_eq!(forwarded.age, Some(31));

        let normalized = forwarded.normalized();
        assert_eq!(normalized.name, None);
        assert_eq!(normalized.email, None);
        assert_eq!(normalized.age, Some(31));
    }

    #[tokio::test]
    async fn test_grpc_delete_user() {
        let user = alice();
        let user_id = user.id.clone();
        let service = UserGrpcService::new(Arc::new(MockUserService::with_user(user)));

        let request = Request::new(user::DeleteUserRequest {
            id: user_id.to_string(),
        });
        let response = user::user_service_server::UserService::delete_user(&service, request)
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.message, "User deleted successfully");

        let request = Request::new(user::DeleteUserRequest {
            id: user_id.to_string(),
        });
        let status = user::user_service_server::UserService::delete_user(&service, request)
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_grpc_list_users() {
        let service = UserGrpcService::new(Arc::new(MockUserService::with_user(alice())));

        let request = Request::new(user::ListUsersRequest { page: 0, limit: 0 });

        let response = user::user_service_server::UserService::list_users(&service, request)
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.users.len(), 1);
        assert_eq!(response.total, 1);
        assert_eq!(response.page, 1);
        assert_eq!(response.limit, 1);
        assert_eq!(response.total_pages, 1);
        assert_eq!(response.message, "Retrieved 1 users (page 1)");
    }

    #[tokio::test]
    async fn test_grpc_internal_error_hides_details() {
        let service = UserGrpcService::new(Arc::new(MockUserService::failing()));

        let request = Request::new(user::ListUsersRequest { page: 1, limit: 10 });

        let status = user::user_service_server::UserService::list_users(&service, request)
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "failed to retrieve users");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (UserdirError::invalid_input("age", "age must be between 1 and 149"), Code::InvalidArgument),
            (UserdirError::not_found("User", "abc"), Code::NotFound),
            (UserdirError::duplicate_email("a@x.com"), Code::AlreadyExists),
            (UserdirError::Database("boom".to_string()), Code::Internal),
            (UserdirError::Cache("boom".to_string()), Code::Internal),
            (UserdirError::Timeout("boom".to_string()), Code::Internal),
        ];

        for (err, code) in cases {
            assert_eq!(to_status(err, "failed").code(), code);
        }

        let status = to_status(
            UserdirError::invalid_input("email", "email format is invalid"),
            "failed",
        );
        assert_eq!(status.message(), "email format is invalid");
    }
}
