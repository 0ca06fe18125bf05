//! Application runner.

use crate::di::{build_app_module, AppModule};
use std::future::Future;
use tracing::info;
use userdir_config::AppConfig;
use userdir_core::UserdirResult;
use userdir_grpc::GrpcServer;

/// A wired application, ready to serve.
pub struct App {
    config: AppConfig,
    module: AppModule,
}

impl App {
    /// Builds all components from configuration.
    pub async fn build(config: AppConfig) -> UserdirResult<Self> {
        let module = build_app_module(&config).await?;
        Ok(Self { config, module })
    }

    /// Wired components.
    #[must_use]
    pub const fn module(&self) -> &AppModule {
        &self.module
    }

    /// Serves gRPC until `shutdown` resolves, then releases resources.
    pub async fn run<F>(self, shutdown: F) -> UserdirResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        let server = GrpcServer::new(&self.config.server, self.module.user_service())?;
        let result = server.serve_with_shutdown(shutdown).await;

        self.module.shutdown().await;
        info!("Server shutdown complete");
        result
    }
}
