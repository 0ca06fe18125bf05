//! # Userdir Server
//!
//! Main entry point: loads configuration, installs logging and serves the
//! user directory over gRPC until Ctrl+C or SIGTERM.

use tokio::signal;
use tracing::{error, info, warn};
use userdir_config::{ConfigLoader, ObservabilityConfig};
use userdir_core::UserdirResult;
use userdir_server::app::App;
use userdir_server::startup::{init_logging, print_banner, print_startup_info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Application error");
        std::process::exit(1);
    }
}

async fn run() -> UserdirResult<()> {
    let config_loader = match ConfigLoader::from_default_location() {
        Ok(loader) => loader,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            return Err(e);
        }
    };
    let config = config_loader.get().await;

    init_logging(&config.observability);
    print_banner();
    info!("Starting userdir server v{}", config.app.version);
    print_startup_info(&config);

    App::build(config).await?.run(shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
