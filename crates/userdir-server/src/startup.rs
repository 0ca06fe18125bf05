//! Server startup utilities.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use userdir_config::{AppConfig, ObservabilityConfig};

/// Builds the log filter. `RUST_LOG` wins over the configured level.
#[must_use]
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},userdir={level},h2=warn,tower=warn,sqlx=warn",
            level = config.log_level
        ))
    })
}

/// Installs the global tracing subscriber.
///
/// Later calls are no-ops, so tests may call this freely.
pub fn init_logging(config: &ObservabilityConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {e}");
    }
}

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r"
                         _ _
  _   _ ___  ___ _ __ __| (_)_ __
 | | | / __|/ _ \ '__/ _` | | '__|
 | |_| \__ \  __/ | | (_| | | |
  \__,_|___/\___|_|  \__,_|_|_|
"
    );
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Version:     {}", config.app.version);
    info!("Environment: {}", config.app.environment);
    info!("gRPC API:    http://{}", config.server.grpc_addr());
    info!("Store:       {:?}", config.store.backend);
    info!(
        "Cache:       {:?} (enabled: {}, ttl: {}s)",
        config.cache.backend, config.cache.enabled, config.cache.default_ttl_secs
    );
    info!("{}", separator);
}
