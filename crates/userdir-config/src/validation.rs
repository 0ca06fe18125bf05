//! Configuration validation.
//!
//! Every rule runs and all failures are collected, so an operator sees the
//! whole list at once instead of fixing one value per restart.

use crate::{AppConfig, CacheBackend, CacheConfig, StoreBackend};
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout or TTL value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Message size limit must be positive.
    InvalidMessageSize { name: String },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Log format is invalid.
    InvalidLogFormat { value: String },
    /// List sweep limit outside the client page-size range.
    InvalidSweepLimit { value: u32, maximum: u32 },
    /// List sweep would touch too many keys, or none.
    InvalidSweepSize { windows: usize, maximum: usize },
    /// A size bound that must hold at least one item.
    ZeroCapacity { name: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "'{}' must be positive, got {}", name, value)
            }
            Self::InvalidMessageSize { name } => {
                write!(f, "Message size limit '{}' must be positive", name)
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
            Self::InvalidLogFormat { value } => {
                write!(f, "Invalid log format: '{}' (valid: pretty, json)", value)
            }
            Self::InvalidSweepLimit { value, maximum } => {
                write!(
                    f,
                    "List sweep limit {} is outside the page size range 1-{}",
                    value, maximum
                )
            }
            Self::InvalidSweepSize { windows, maximum } => {
                write!(
                    f,
                    "List sweep covers {} windows (must be between 1 and {})",
                    windows, maximum
                )
            }
            Self::ZeroCapacity { name } => {
                write!(f, "'{}' must be at least 1", name)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Result of configuration validation containing all errors found.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];
    /// Valid log formats.
    const VALID_LOG_FORMATS: &'static [&'static str] = &["pretty", "json"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();

        Self::validate_server(&config.server, &mut result);
        if config.store.backend == StoreBackend::Postgres {
            Self::validate_database(&config.database, &mut result);
        }
        Self::validate_cache(&config.cache, &mut result);
        Self::validate_observability(&config.observability, &mut result);

        result.into_result()
    }

    fn validate_server(config: &crate::ServerConfig, result: &mut ValidationResult) {
        if config.grpc_port == 0 {
            result.add_error(ConfigValidationError::InvalidPort {
                name: "grpc_port".to_string(),
                value: config.grpc_port,
            });
        }

        if config.request_timeout_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveTimeout {
                name: "server.request_timeout_secs".to_string(),
                value: 0,
            });
        }

        if config.max_recv_message_size == 0 {
            result.add_error(ConfigValidationError::InvalidMessageSize {
                name: "server.max_recv_message_size".to_string(),
            });
        }
        if config.max_send_message_size == 0 {
            result.add_error(ConfigValidationError::InvalidMessageSize {
                name: "server.max_send_message_size".to_string(),
            });
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, result: &mut ValidationResult) {
        if config.url.is_empty() {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else if !config.url.starts_with("postgres://") && !config.url.starts_with("postgresql://") {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL must start with postgres:// or postgresql://".to_string(),
            });
        }

        if config.min_connections > config.max_connections {
            result.add_error(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
                value: 0,
            });
        }
        if config.idle_timeout_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveTimeout {
                name: "database.idle_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_cache(config: &CacheConfig, result: &mut ValidationResult) {
        // TTL and sweep shape matter for every backend, the URL only for Redis.
        if config.default_ttl_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveTimeout {
                name: "cache.default_ttl_secs".to_string(),
                value: 0,
            });
        }
        if config.operation_timeout_ms == 0 {
            result.add_error(ConfigValidationError::NonPositiveTimeout {
                name: "cache.operation_timeout_ms".to_string(),
                value: 0,
            });
        }

        for &limit in &config.list_sweep_limits {
            if limit == 0 || limit > CacheConfig::MAX_PAGE_LIMIT {
                result.add_error(ConfigValidationError::InvalidSweepLimit {
                    value: limit,
                    maximum: CacheConfig::MAX_PAGE_LIMIT,
                });
            }
        }
        let windows = config.sweep_window_count();
        if windows == 0 || windows > CacheConfig::MAX_SWEEP_WINDOWS {
            result.add_error(ConfigValidationError::InvalidSweepSize {
                windows,
                maximum: CacheConfig::MAX_SWEEP_WINDOWS,
            });
        }

        if config.backend == CacheBackend::Memory && config.memory_max_entries == 0 {
            result.add_error(ConfigValidationError::ZeroCapacity {
                name: "cache.memory_max_entries".to_string(),
            });
        }

        if config.backend != CacheBackend::Redis || !config.enabled {
            return;
        }

        match Url::parse(&config.url) {
            Ok(url) if url.scheme() == "redis" || url.scheme() == "rediss" => {}
            _ => result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            }),
        }

        if config.pool_size > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
    }

    fn validate_observability(config: &crate::ObservabilityConfig, result: &mut ValidationResult) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }

        let format = config.log_format.to_lowercase();
        if !Self::VALID_LOG_FORMATS.contains(&format.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogFormat {
                value: config.log_format.clone(),
            });
        }
    }
}

/// Formats validation errors for display.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = AppConfig::default();
        config.server.grpc_port = 0;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidPort { name, .. } if name == "grpc_port"
        )));
    }

    #[test]
    fn test_invalid_pool_size() {
        let mut config = AppConfig::default();
        config.database.min_connections = 100;
        config.database.max_connections = 10;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidPoolSize { .. })));
    }

    #[test]
    fn test_database_rules_skipped_for_memory_store() {
        let mut config = AppConfig::default();
        config.store.backend = StoreBackend::Memory;
        config.database.url = "mysql://elsewhere".to_string();

        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_database_url() {
        let mut config = AppConfig::default();
        config.database.url = "mysql://localhost/userdir".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidUrl { url_type, .. } if url_type == "database"
        )));
    }

    #[test]
    fn test_invalid_redis_url() {
        let mut config = AppConfig::default();
        config.cache.url = "http://localhost:6379".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidUrl { url_type, .. } if url_type == "redis"
        )));
    }

    #[test]
    fn test_redis_url_ignored_when_cache_disabled() {
        let mut config = AppConfig::default();
        config.cache.enabled = false;
        config.cache.url = String::new();

        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = AppConfig::default();
        config.cache.default_ttl_secs = 0;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::NonPositiveTimeout { name, .. } if name == "cache.default_ttl_secs"
        )));
    }

    #[test]
    fn test_sweep_limit_out_of_range() {
        let mut config = AppConfig::default();
        config.cache.list_sweep_limits = vec![10, 500];

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidSweepLimit { value: 500, .. }
        )));
    }

    #[test]
    fn test_sweep_must_be_bounded() {
        let mut config = AppConfig::default();
        config.cache.list_sweep_limits = vec![1, 2, 5, 10, 20];
        config.cache.list_sweep_pages = 500;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidSweepSize { windows: 2500, .. }
        )));
    }

    #[test]
    fn test_empty_sweep_rejected() {
        let mut config = AppConfig::default();
        config.cache.list_sweep_limits.clear();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidSweepSize { windows: 0, .. }
        )));
    }

    #[test]
    fn test_memory_cache_needs_capacity() {
        let mut config = AppConfig::default();
        config.cache.memory_max_entries = 0;
        assert!(ConfigValidator::validate(&config).is_ok());

        config.cache.backend = CacheBackend::Memory;
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::ZeroCapacity { name } if name == "cache.memory_max_entries"
        )));
    }

    #[test]
    fn test_invalid_log_settings() {
        let mut config = AppConfig::default();
        config.observability.log_level = "verbose".to_string();
        config.observability.log_format = "xml".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_format_validation_errors() {
        let errors = vec![
            ConfigValidationError::InvalidPort {
                name: "grpc_port".to_string(),
                value: 0,
            },
            ConfigValidationError::InvalidSweepSize {
                windows: 0,
                maximum: 1000,
            },
        ];

        let output = format_validation_errors(&errors);
        assert!(output.contains("Invalid port"));
        assert!(output.contains("List sweep covers 0 windows"));
    }
}
