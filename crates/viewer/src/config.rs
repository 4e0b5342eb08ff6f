//! Viewer configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VIEWER_DATABASE_URL` - `SQLite` connection string, pointing at the same
//!   database the admin service writes (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `VIEWER_HOST` - Bind address (default: 127.0.0.1)
//! - `VIEWER_PORT` - Listen port (default: 3000)
//! - `MENSA_REVISION_POLL_MS` - Catalog revision poll interval in
//!   milliseconds (default: 2000)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Viewer application configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// How often to poll the catalog revision for changes
    pub revision_poll_interval: Duration,
}

impl ViewerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("VIEWER_DATABASE_URL")?;
        let host = get_env_or_default("VIEWER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("VIEWER_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("VIEWER_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("VIEWER_PORT".to_string(), e.to_string()))?;
        let poll_ms = get_env_or_default("MENSA_REVISION_POLL_MS", "2000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MENSA_REVISION_POLL_MS".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            revision_poll_interval: Duration::from_millis(poll_ms),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ViewerConfig {
            database_url: SecretString::from("sqlite://mensa.db"),
            host: "0.0.0.0".parse().unwrap(),
            port: 3000,
            revision_poll_interval: Duration::from_millis(2000),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 3000);
    }
}
