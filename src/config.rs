//! Environment-driven configuration for the user API client.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },

    #[error("Invalid base URL '{url}': {details}")]
    InvalidUrl { url: String, details: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load an environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Which repository adapter backs the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// REST API that assigns ids itself.
    #[default]
    Server,
    /// REST demo API that echoes a constant id on create.
    Placeholder,
    /// In-process store, no network.
    Memory,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(Backend::Server),
            "placeholder" => Ok(Backend::Placeholder),
            "memory" => Ok(Backend::Memory),
            other => Err(format!(
                "unknown backend '{other}' (expected server, placeholder or memory)"
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Server => "server",
            Backend::Placeholder => "placeholder",
            Backend::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Connection settings for the user collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub backend: Backend,
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Creates a config for `base_url`, validating and normalizing it.
    pub fn new(base_url: &str, backend: Backend) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            backend,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            backend: Backend::Server,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FromEnv for ApiConfig {
    /// Reads from environment variables with sensible defaults:
    /// - USER_API_URL: defaults to http://localhost:8000/api/v1
    /// - USER_API_BACKEND: server, placeholder or memory (defaults to server)
    /// - USER_API_TIMEOUT_SECS: defaults to 10
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_or_default("USER_API_URL", DEFAULT_BASE_URL);

        let backend: Backend = env_or_default("USER_API_BACKEND", "server")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "USER_API_BACKEND".to_string(),
                details,
            })?;

        let timeout_secs: u64 = env_or_default("USER_API_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "USER_API_TIMEOUT_SECS".to_string(),
                details: format!("{}", e),
            })?;

        let mut config = ApiConfig::new(&base_url, backend)?;
        config.request_timeout = Duration::from_secs(timeout_secs);
        Ok(config)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/').to_string();
    let invalid = |details: &str| ConfigError::InvalidUrl {
        url: raw.to_string(),
        details: details.to_string(),
    };

    if url.is_empty() {
        return Err(invalid("URL cannot be empty"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(invalid("URL must start with http:// or https://"));
    }
    reqwest::Url::parse(&url).map_err(|e| invalid(&e.to_string()))?;

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 3] = ["USER_API_URL", "USER_API_BACKEND", "USER_API_TIMEOUT_SECS"];

    #[test]
    fn test_from_env_with_defaults() {
        temp_env::with_vars_unset(VARS, || {
            let config = ApiConfig::from_env().unwrap();
            assert_eq!(config, ApiConfig::default());
            assert_eq!(config.base_url, "http://localhost:8000/api/v1");
        });
    }

    #[test]
    fn test_from_env_with_custom_values() {
        temp_env::with_vars(
            [
                ("USER_API_URL", Some("https://jsonplaceholder.typicode.com/")),
                ("USER_API_BACKEND", Some("Placeholder")),
                ("USER_API_TIMEOUT_SECS", Some("3")),
            ],
            || {
                let config = ApiConfig::from_env().unwrap();
                assert_eq!(config.base_url, "https://jsonplaceholder.typicode.com");
                assert_eq!(config.backend, Backend::Placeholder);
                assert_eq!(config.request_timeout, Duration::from_secs(3));
            },
        );
    }

    #[test]
    fn test_from_env_rejects_unknown_backend() {
        temp_env::with_vars(
            [("USER_API_BACKEND", Some("mongo")), ("USER_API_URL", None)],
            || {
                let err = ApiConfig::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "USER_API_BACKEND"));
            },
        );
    }

    #[test]
    fn test_from_env_rejects_bad_timeout() {
        temp_env::with_vars(
            [("USER_API_TIMEOUT_SECS", Some("soon")), ("USER_API_BACKEND", None)],
            || {
                let err = ApiConfig::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "USER_API_TIMEOUT_SECS"));
            },
        );
    }

    #[test]
    fn test_base_url_validation() {
        assert!(matches!(
            ApiConfig::new("", Backend::Server),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ApiConfig::new("ftp://example.com", Backend::Server),
            Err(ConfigError::InvalidUrl { .. })
        ));
        let config = ApiConfig::new("http://127.0.0.1:9000/api/", Backend::Memory).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000/api");
    }
}
