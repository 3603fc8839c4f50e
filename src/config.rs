//! Configuration Module
//!
//! Handles loading, defaulting and validating server and storage configuration
//! from environment variables or a JSON file.

use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// == Config Error ==
/// Failure to load or validate configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("couldn't read configuration file: {0}")]
    Read(#[from] std::io::Error),

    /// Configuration file is not valid JSON for [`Config`]
    #[error("couldn't parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required field is zero or empty
    #[error("{0} is empty")]
    EmptyField(&'static str),
}

/// Storage parameters consumed by the store and the sweeper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Default TTL in seconds for objects stored without explicit expiry
    pub default_ttl: u64,
    /// Maximum number of collections, the default one included
    pub max_collections_count: usize,
    /// Sweeper tick interval in seconds
    pub refresh_time: u64,
    /// Per-collection sweep deadline in seconds
    pub refresh_timeout: u64,
    /// Maximum number of collections swept concurrently
    pub max_refreshes: usize,
}

impl StorageConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_time)
    }

    pub fn refresh_task_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout)
    }

    /// Checks that every field is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            s if s.default_ttl == 0 => Err(ConfigError::EmptyField("default_ttl")),
            s if s.refresh_time == 0 => Err(ConfigError::EmptyField("refresh_time")),
            s if s.refresh_timeout == 0 => Err(ConfigError::EmptyField("refresh_timeout")),
            s if s.max_collections_count == 0 => {
                Err(ConfigError::EmptyField("max_collections_count"))
            }
            s if s.max_refreshes == 0 => Err(ConfigError::EmptyField("max_refreshes")),
            _ => Ok(()),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default_ttl: 300,
            max_collections_count: 16,
            refresh_time: 1,
            refresh_timeout: 5,
            max_refreshes: 4,
        }
    }
}

/// Basic auth credentials; both empty disables authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub user: String,
    pub pass: String,
}

impl AuthConfig {
    pub fn is_enabled(&self) -> bool {
        !(self.user.is_empty() && self.pass.is_empty())
    }
}

/// HTTP server parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP server port
    pub port: u16,
    /// Basic auth credentials
    pub auth: AuthConfig,
    /// Request timeout in milliseconds
    pub read_timeout_ms: u64,
}

impl ServerConfig {
    /// Returns the `host:port` address to bind.
    pub fn url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            s if s.host.is_empty() => Err(ConfigError::EmptyField("host")),
            s if s.port == 0 => Err(ConfigError::EmptyField("port")),
            s if s.read_timeout_ms == 0 => Err(ConfigError::EmptyField("read_timeout")),
            _ => Ok(()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            auth: AuthConfig::default(),
            read_timeout_ms: 5000,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Loads configuration from `CONFIG_PATH` if set, otherwise from the
    /// environment, and validates it.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match env::var("CONFIG_PATH") {
            Ok(path) if !path.is_empty() => Self::from_file(path)?,
            _ => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `MAX_COLLECTIONS_COUNT` - Collection limit (default: 16)
    /// - `REFRESH_TIME` - Sweep interval in seconds (default: 1)
    /// - `REFRESH_TIMEOUT` - Per-collection sweep deadline in seconds (default: 5)
    /// - `MAX_REFRESHES` - Concurrent sweeps (default: 4)
    /// - `SERVER_HOST` - Bind address (default: 0.0.0.0)
    /// - `SERVER_PORT` - HTTP server port (default: 8081)
    /// - `AUTH_USER` / `AUTH_PASS` - Basic auth credentials (default: disabled)
    /// - `READ_TIMEOUT_MS` - Request timeout (default: 5000)
    pub fn from_env() -> Self {
        let storage = StorageConfig::default();
        let server = ServerConfig::default();

        Self {
            storage: StorageConfig {
                default_ttl: env_or("DEFAULT_TTL", storage.default_ttl),
                max_collections_count: env_or(
                    "MAX_COLLECTIONS_COUNT",
                    storage.max_collections_count,
                ),
                refresh_time: env_or("REFRESH_TIME", storage.refresh_time),
                refresh_timeout: env_or("REFRESH_TIMEOUT", storage.refresh_timeout),
                max_refreshes: env_or("MAX_REFRESHES", storage.max_refreshes),
            },
            server: ServerConfig {
                host: env_or("SERVER_HOST", server.host),
                port: env_or("SERVER_PORT", server.port),
                auth: AuthConfig {
                    user: env_or("AUTH_USER", server.auth.user),
                    pass: env_or("AUTH_PASS", server.auth.pass),
                },
                read_timeout_ms: env_or("READ_TIMEOUT_MS", server.read_timeout_ms),
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.storage.validate()
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
