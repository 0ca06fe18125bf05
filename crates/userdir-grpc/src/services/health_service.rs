//! gRPC health service implementation.

use crate::proto::health::{
    health_check_response::ServingStatus, health_server::Health, HealthCheckRequest,
    HealthCheckResponse,
};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tonic::{Request, Response, Status};
use tracing::{debug, info};

/// Fully qualified name of the user service, as clients ask for it.
pub const USER_SERVICE_NAME: &str = "userdir.user.v1.UserService";

/// Health service implementation.
///
/// Clones share one status; flipping it notifies every open `Watch` stream.
#[derive(Debug, Clone)]
pub struct HealthServiceImpl {
    status: Arc<watch::Sender<ServingStatus>>,
}

impl Default for HealthServiceImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthServiceImpl {
    /// Creates a new health service reporting `SERVING`.
    #[must_use]
    pub fn new() -> Self {
        let (status, _) = watch::channel(ServingStatus::Serving);
        Self {
            status: Arc::new(status),
        }
    }

    /// Marks the server as draining.
    pub fn set_not_serving(&self) {
        info!("Health status set to NOT_SERVING");
        self.status.send_replace(ServingStatus::NotServing);
    }

    /// Marks the server as ready.
    pub fn set_serving(&self) {
        self.status.send_replace(ServingStatus::Serving);
    }

    fn is_known(service: &str) -> bool {
        service.is_empty() || service == USER_SERVICE_NAME
    }

    /// Gets the health status for a service.
    fn get_status(&self, service: &str) -> ServingStatus {
        debug!(service, "Health check");

        if Self::is_known(service) {
            *self.status.borrow()
        } else {
            ServingStatus::ServiceUnknown
        }
    }
}

fn response(status: ServingStatus) -> Result<HealthCheckResponse, Status> {
    Ok(HealthCheckResponse {
        status: status.into(),
    })
}

#[tonic::async_trait]
impl Health for HealthServiceImpl {
    async fn check(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        let req = request.into_inner();
        Ok(Response::new(response(self.get_status(&req.service))?))
    }

    type WatchStream = Pin<Box<dyn Stream<Item = Result<HealthCheckResponse, Status>> + Send>>;

    async fn watch(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<Self::WatchStream>, Status> {
        let req = request.into_inner();

        let stream: Self::WatchStream = if Self::is_known(&req.service) {
            Box::pin(WatchStream::new(self.status.subscribe()).map(response))
        } else {
            Box::pin(tokio_stream::once(response(ServingStatus::ServiceUnknown)))
        };

        Ok(Response::new(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn check(service: &HealthServiceImpl, name: &str) -> i32 {
        service
            .check(Request::new(HealthCheckRequest {
                service: name.to_string(),
            }))
            .await
            .unwrap()
            .into_inner()
            .status
    }

    #[tokio::test]
    async fn test_check_known_and_unknown_services() {
        let service = HealthServiceImpl::new();

        assert_eq!(check(&service, "").await, ServingStatus::Serving as i32);
        assert_eq!(
            check(&service, USER_SERVICE_NAME).await,
            ServingStatus::Serving as i32
        );
        assert_eq!(
            check(&service, "other.Service").await,
            ServingStatus::ServiceUnknown as i32
        );
    }

    #[tokio::test]
    async fn test_status_shared_between_clones() {
        let service = HealthServiceImpl::new();
        let handle = service.clone();

        handle.set_not_serving();
        assert_eq!(check(&service, "").await, ServingStatus::NotServing as i32);

        handle.set_serving();
        assert_eq!(check(&service, "").await, ServingStatus::Serving as i32);
    }

    #[tokio::test]
    async fn test_watch_streams_changes() {
        let service = HealthServiceImpl::new();
        let mut stream = service
            .watch(Request::new(HealthCheckRequest {
                service: String::new(),
            }))
            .await
            .unwrap()
            .into_inner();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.status, ServingStatus::Serving as i32);

        service.set_not_serving();
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.status, ServingStatus::NotServing as i32);
    }
}
