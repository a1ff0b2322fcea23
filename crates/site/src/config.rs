//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DIRECTORY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `DIRECTORY_HOST` - Bind address (default: 127.0.0.1)
//! - `DIRECTORY_PORT` - Listen port (default: 3000)
//! - `DIRECTORY_BASE_URL` - Public URL used in the sitemap (default: <http://localhost:3000>)
//! - `DIRECTORY_SITE_NAME` - Brand shown in page titles (default: `AuroraILServices`)
//! - `DIRECTORY_DEFAULT_CITY` - City featured on the home page (default: aurora-il)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, without trailing slash
    pub base_url: String,
    /// Brand name shown in titles and the header
    pub site_name: String,
    /// City key whose categories are shown on the home page
    pub default_city: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl SiteConfig {
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

        let database_url = get_database_url("DIRECTORY_DATABASE_URL")?;
        let host = parse_env("DIRECTORY_HOST", "127.0.0.1")?;
        let port = parse_env("DIRECTORY_PORT", "3000")?;
        let base_url = validate_base_url(
            "DIRECTORY_BASE_URL",
            &get_env_or_default("DIRECTORY_BASE_URL", "http://localhost:3000"),
        )?;
        let site_name = get_env_or_default("DIRECTORY_SITE_NAME", "AuroraILServices");
        let default_city =
            get_env_or_default("DIRECTORY_DEFAULT_CITY", "aurora-il").to_lowercase();

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            site_name,
            default_city,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Absolute URL for a site path such as `/business/acme-aurora-il`.
    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Check that a base URL is absolute http(s) and strip any trailing slash.
fn validate_base_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Configuration for router and service tests.
    pub fn test_config() -> SiteConfig {
        SiteConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "https://directory.test".to_string(),
            site_name: "AuroraILServices".to_string(),
            default_city: "aurora-il".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            test_config().absolute_url("/business/acme-aurora-il"),
            "https://directory.test/business/acme-aurora-il"
        );
    }

    #[test]
    fn test_validate_base_url_strips_trailing_slash() {
        let url = validate_base_url("TEST", "https://example.org/").unwrap();
        assert_eq!(url, "https://example.org");
    }

    #[test]
    fn test_validate_base_url_rejects_relative() {
        let err = validate_base_url("TEST", "example.org").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TEST"));
    }

    #[test]
    fn test_validate_base_url_rejects_other_schemes() {
        assert!(validate_base_url("TEST", "ftp://example.org").is_err());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let debug_output = format!("{:?}", test_config());
        assert!(!debug_output.contains("postgres://localhost/test"));
    }
}
