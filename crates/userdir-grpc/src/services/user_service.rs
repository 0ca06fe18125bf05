//! User gRPC service implementation.

use crate::proto::user;
use userdir_core::{ErrorKind, PageRequest, UserId, UserdirError};
use userdir_service::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use userdir_service::UserService;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{debug, error};

/// User gRPC service implementation.
pub struct UserGrpcService {
    user_service: Arc<dyn UserService>,
}

impl UserGrpcService {
    /// Creates a new user gRPC service.
    pub fn new(user_service: Arc<dyn UserService>) -> Self {
        Self { user_service }
    }
}

#[tonic::async_trait]
impl user::user_service_server::UserService for UserGrpcService {
    async fn create_user(
        &self,
        request: Request<user::CreateUserRequest>,
    ) -> Result<Response<user::CreateUserResponse>, Status> {
        let req = request.into_inner();
        debug!(user_email = %req.email, "gRPC CreateUser");

        let create_request = CreateUserRequest {
            name: req.name,
            email: req.email,
            age: req.age,
        };

        let response = self
            .user_service
            .create_user(create_request)
            .await
            .map_err(|e| to_status(e, "failed to create user"))?;

        Ok(Response::new(user::CreateUserResponse {
            user: Some(to_proto_user(&response)),
            message: "User created successfully".to_string(),
        }))
    }

    async fn get_user(
        &self,
        request: Request<user::GetUserRequest>,
    ) -> Result<Response<user::GetUserResponse>, Status> {
        let req = request.into_inner();
        debug!(user_id = %req.id, "gRPC GetUser");

        let response = self
            .user_service
            .get_user(&UserId::new(req.id))
            .await
            .map_err(|e| to_status(e, "failed to retrieve user"))?;

        Ok(Response::new(user::GetUserResponse {
            user: Some(to_proto_user(&response)),
            message: "User retrieved successfully".to_string(),
        }))
    }

    async fn update_user(
        &self,
        request: Request<user::UpdateUserRequest>,
    ) -> Result<Response<user::UpdateUserResponse>, Status> {
        let req = request.into_inner();
        debug!(user_id = %req.id, "gRPC UpdateUser");

        let update_request = UpdateUserRequest {
            name: Some(req.name),
            email: Some(req.email),
            age: Some(req.age),
        };

        let response = self
            .user_service
            .update_user(&UserId::new(req.id), update_request)
            .await
            .map_err(|e| to_status(e, "failed to update user"))?;

        Ok(Response::new(user::UpdateUserResponse {
            user: Some(to_proto_user(&response)),
            message: "User updated successfully".to_string(),
        }))
    }

    async fn delete_user(
        &self,
        request: Request<user::DeleteUserRequest>,
    ) -> Result<Response<user::DeleteUserResponse>, Status> {
        let req = request.into_inner();
        debug!(user_id = %req.id, "gRPC DeleteUser");

        self.user_service
            .delete_user(&UserId::new(req.id))
            .await
            .map_err(|e| to_status(e, "failed to delete user"))?;

        Ok(Response::new(user::DeleteUserResponse {
            message: "User deleted successfully".to_string(),
        }))
    }

    async fn list_users(
        &self,
        request: Request<user::ListUsersRequest>,
    ) -> Result<Response<user::ListUsersResponse>, Status> {
        let req = request.into_inner();
        debug!(page = req.page, limit = req.limit, "gRPC ListUsers");

        let response = self
            .user_service
            .list_users(PageRequest::new(req.page, req.limit))
            .await
            .map_err(|e| to_status(e, "failed to retrieve users"))?;

        Ok(Response::new(user::ListUsersResponse {
            users: response.users.iter().map(to_proto_user).collect(),
            total: saturate(response.total),
            message: response.summary(),
            page: saturate(u64::from(response.page)),
            limit: saturate(u64::from(response.limit)),
            total_pages: saturate(response.total_pages),
        }))
    }
}

/// Maps a service error onto a gRPC status.
///
/// Server-side failures surface only `fallback`; the detail goes to the log.
pub fn to_status(err: UserdirError, fallback: &str) -> Status {
    match err.kind() {
        ErrorKind::InvalidInput => match err {
            UserdirError::InvalidInput { message, .. } => Status::invalid_argument(message),
            other => Status::invalid_argument(other.to_string()),
        },
        ErrorKind::NotFound => match err {
            UserdirError::NotFound { id, .. } => {
                Status::not_found(format!("user with ID {id} not found"))
            }
            other => Status::not_found(other.to_string()),
        },
        ErrorKind::Conflict => Status::already_exists(match err {
            UserdirError::Conflict(message) => message,
            other => other.to_string(),
        }),
        ErrorKind::Internal => {
            error!(error = %err, error_code = err.error_code(), "gRPC request failed");
            Status::internal(fallback)
        }
    }
}

fn to_proto_user(user: &UserResponse) -> user::User {
    user::User {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        age: user.age,
        created_at: user.created_at.timestamp(),
        updated_at: user.updated_at.timestamp(),
    }
}

fn saturate(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
