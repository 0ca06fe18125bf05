//! gRPC server setup.

use crate::proto::{health, user};
use crate::services::{HealthServiceImpl, UserGrpcService};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tonic::transport::Server;
use tracing::info;
use userdir_config::ServerConfig;
use userdir_core::{UserdirError, UserdirResult};
use userdir_service::UserService;

/// gRPC server exposing the user service and health checks.
pub struct GrpcServer {
    addr: SocketAddr,
    request_timeout: Duration,
    max_recv_message_size: usize,
    max_send_message_size: usize,
    user_service: Arc<dyn UserService>,
    health: HealthServiceImpl,
}

impl GrpcServer {
    /// Creates a new gRPC server.
    pub fn new(config: &ServerConfig, user_service: Arc<dyn UserService>) -> UserdirResult<Self> {
        let addr = config.grpc_addr().parse().map_err(|e| {
            UserdirError::Configuration(format!("Invalid gRPC address: {e}"))
        })?;

        Ok(Self {
            addr,
            request_timeout: config.request_timeout(),
            max_recv_message_size: config.max_recv_message_size,
            max_send_message_size: config.max_send_message_size,
            user_service,
            health: HealthServiceImpl::new(),
        })
    }

    /// Bound address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Handle for flipping the reported health status.
    #[must_use]
    pub fn health(&self) -> HealthServiceImpl {
        self.health.clone()
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests.
    ///
    /// Health reports `NOT_SERVING` as soon as the shutdown signal fires.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> UserdirResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        info!(addr = %self.addr, "Starting gRPC server");

        let user_grpc_service = user::user_service_server::UserServiceServer::new(
            UserGrpcService::new(self.user_service),
        )
        .max_decoding_message_size(self.max_recv_message_size)
        .max_encoding_message_size(self.max_send_message_size);

        let health = self.health.clone();
        let signal = async move {
            shutdown.await;
            health.set_not_serving();
        };

        Server::builder()
            .timeout(self.request_timeout)
            .add_service(health::health_server::HealthServer::new(self.health))
            .add_service(user_grpc_service)
            .serve_with_shutdown(self.addr, signal)
            .await
            .map_err(|e| UserdirError::Internal(format!("gRPC server error: {e}")))?;

        info!("gRPC server stopped");
        Ok(())
    }
}
