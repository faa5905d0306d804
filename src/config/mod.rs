//! Configuration module for Homeshelf
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`HOMESHELF_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! This is the *server* configuration. The user's shelf (services and widgets)
//! lives in a separate JSON document, see [`crate::shelf`].
//!
//! # Example
//!
//! ```rust
//! use homeshelf::config::HomeshelfConfig;
//!
//! let config = HomeshelfConfig::default();
//! assert_eq!(config.server.port, 7575);
//!
//! let toml = r#"
//! [server]
//! port = 9000
//! "#;
//! let config: HomeshelfConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.port, 9000);
//! ```

pub mod error;
pub mod logging;
pub mod polling;
pub mod reachability;
pub mod server;
pub mod storage;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;
pub use reachability::ReachabilityConfig;
pub use server::ServerConfig;
pub use storage::StorageConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the Homeshelf server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HomeshelfConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Reachability probe settings
    pub reachability: ReachabilityConfig,
    /// Widget polling settings
    pub polling: PollingConfig,
    /// Where the shelf document is stored
    pub storage: StorageConfig,
}

impl HomeshelfConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Io {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("HOMESHELF_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("HOMESHELF_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("HOMESHELF_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HOMESHELF_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(path) = std::env::var("HOMESHELF_STORAGE_PATH") {
            if !path.is_empty() {
                self.storage.path = path.into();
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }
        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "server.request_timeout_seconds".to_string(),
                message: "request timeout must be at least one second".to_string(),
            });
        }
        if self.reachability.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "reachability.timeout_seconds".to_string(),
                message: "timeout must be at least one second".to_string(),
            });
        }
        if self.reachability.ping_binary.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "reachability.ping_binary".to_string(),
                message: "ping binary cannot be empty".to_string(),
            });
        }
        if self.polling.refresh_interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "polling.refresh_interval_ms".to_string(),
                message: "refresh interval must be non-zero".to_string(),
            });
        }
        if self.polling.max_failures == 0 {
            return Err(ConfigError::Validation {
                field: "polling.max_failures".to_string(),
                message: "max_failures must be at least 1".to_string(),
            });
        }
        if self.storage.key.is_empty() {
            return Err(ConfigError::Validation {
                field: "storage.key".to_string(),
                message: "storage key cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
