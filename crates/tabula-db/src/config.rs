//! # Database Configuration
//!
//! Connection settings for the repository pool.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Sources                                │
//! │                                                                         │
//! │  1. Explicit builder                                                   │
//! │     DbConfig::new("sqlite://data/app.db").max_connections(4)           │
//! │                                                                         │
//! │  2. Environment variables (DbConfig::from_env)                         │
//! │     DATABASE_URL=sqlite://data/app.db         (required)               │
//! │     DATABASE_MAX_CONNECTIONS=1                                         │
//! │     DATABASE_MAX_LIFETIME_SECS=3600                                    │
//! │     DATABASE_ACQUIRE_TIMEOUT_SECS=30                                   │
//! │                                                                         │
//! │  3. Any serde source (DbConfig is Deserialize)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single Connection Default
//! The pool holds one connection unless told otherwise, so every operation
//! on a repository is serialized through it and an open transaction blocks
//! other callers until it ends.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Environment variable holding the connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
const MAX_CONNECTIONS_ENV: &str = "DATABASE_MAX_CONNECTIONS";
const MAX_LIFETIME_ENV: &str = "DATABASE_MAX_LIFETIME_SECS";
const ACQUIRE_TIMEOUT_ENV: &str = "DATABASE_ACQUIRE_TIMEOUT_SECS";

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

/// Database configuration.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tabula_db::DbConfig;
///
/// let config = DbConfig::new("sqlite://data/app.db")
///     .max_connections(4)
///     .max_lifetime(Some(Duration::from_secs(600)));
///
/// assert_eq!(config.max_connections, 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Connection string, e.g. `sqlite://data/app.db` or `sqlite::memory:`.
    pub database_url: String,

    /// Maximum number of open connections, which also bounds idle ones.
    /// Default: 1
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 0
    pub min_connections: u32,

    /// Connections older than this are closed and replaced.
    /// Default: 1 hour
    pub max_lifetime: Option<Duration>,

    /// How long a caller waits for the connection before failing.
    /// Default: 30 seconds
    pub acquire_timeout: Duration,

    /// Idle time before a connection is closed.
    /// Default: none
    pub idle_timeout: Option<Duration>,
}

impl DbConfig {
    /// Creates a configuration for the given connection string.
    pub fn new(database_url: impl Into<String>) -> Self {
        DbConfig {
            database_url: database_url.into(),
            max_connections: 1,
            min_connections: 0,
            max_lifetime: Some(Duration::from_secs(3600)),
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: None,
        }
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// The single connection is never recycled: closing it would drop the
    /// database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            max_lifetime: None,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: None,
        }
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from any key lookup.
    ///
    /// `from_env` is this with `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(DATABASE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired(DATABASE_URL_ENV.to_string()))?;
        let mut config = DbConfig::new(url);

        if let Some(raw) = lookup(MAX_CONNECTIONS_ENV) {
            config.max_connections = parse(MAX_CONNECTIONS_ENV, &raw)?;
        }
        if let Some(raw) = lookup(MAX_LIFETIME_ENV) {
            let secs: u64 = parse(MAX_LIFETIME_ENV, &raw)?;
            config.max_lifetime = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(ACQUIRE_TIMEOUT_ENV) {
            config.acquire_timeout = Duration::from_secs(parse(ACQUIRE_TIMEOUT_ENV, &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection lifetime limit; `None` keeps connections forever.
    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// Sets the acquire timeout.
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Sets the idle timeout.
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Checks the pool bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue(MAX_CONNECTIONS_ENV.to_string()));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::InvalidValue("min_connections".to_string()));
        }
        Ok(())
    }

    /// Whether the URL points at an in-memory SQLite database.
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}
