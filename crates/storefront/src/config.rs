//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory for persisted client state (default: data)
//! - `STOREFRONT_TOAST_MS` - How long "added to cart" toasts stay visible (default: 2800)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g. production)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::services::toast::DEFAULT_DISPLAY_DURATION;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the persisted cart
    pub data_dir: PathBuf,
    /// How long a cart toast stays visible
    pub toast_duration: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: PathBuf::from("data"),
            toast_duration: DEFAULT_DISPLAY_DURATION,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_env(&lookup, "STOREFRONT_HOST")?.unwrap_or(defaults.host);
        let port = parse_env(&lookup, "STOREFRONT_PORT")?.unwrap_or(defaults.port);
        let data_dir = lookup("STOREFRONT_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.data_dir, PathBuf::from);
        let toast_duration = parse_env(&lookup, "STOREFRONT_TOAST_MS")?
            .map_or(defaults.toast_duration, Duration::from_millis);
        let sentry_dsn = lookup("SENTRY_DSN").filter(|v| !v.is_empty());
        let sentry_environment = lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty());

        Ok(Self {
            host,
            port,
            data_dir,
            toast_duration,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if it is set.
fn parse_env<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.toast_duration, Duration::from_millis(2800));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_DATA_DIR", "/var/lib/serene"),
            ("STOREFRONT_TOAST_MS", "1500"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/serene"));
        assert_eq!(config.toast_duration, Duration::from_millis(1500));
        assert_eq!(
            config.sentry_dsn.as_deref(),
            Some("https://key@sentry.example/1")
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_host() {
        assert!(load(&[("STOREFRONT_HOST", "localhost:3000")]).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig::default();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
