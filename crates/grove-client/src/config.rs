//! API client configuration.
//!
//! Configuration comes from environment variables (a `.env` file is loaded
//! by the binary before this runs):
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | GROVE_API_URL | http://localhost:3000/api/admin | Admin API base URL |
//! | GROVE_API_TOKEN | (none) | Bearer token |
//! | GROVE_API_TIMEOUT | 30 | Request timeout (seconds) |

use grove_core::defaults;
use thiserror::Error;
use tracing::debug;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for grove_core::Error {
    fn from(e: ConfigError) -> Self {
        grove_core::Error::Config(e.to_string())
    }
}

/// Tree-tracker admin API client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// Bearer token sent with every request (optional for local servers).
    pub api_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_URL.to_string(),
            api_token: None,
            timeout_secs: defaults::API_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Create from environment variables, falling back to defaults.
    pub fn from_env() -> ConfigResult<Self> {
        let base_url =
            std::env::var(defaults::ENV_API_URL).unwrap_or_else(|_| defaults::API_URL.to_string());
        let api_token = std::env::var(defaults::ENV_API_TOKEN)
            .ok()
            .filter(|t| !t.is_empty());
        let timeout_secs = match std::env::var(defaults::ENV_API_TIMEOUT) {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: defaults::ENV_API_TIMEOUT,
                value: raw,
            })?,
            Err(_) => defaults::API_TIMEOUT_SECS,
        };

        let config = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            timeout_secs,
        };
        config.validate()?;

        debug!(
            base_url = %config.base_url,
            token_set = config.api_token.is_some(),
            timeout_secs = config.timeout_secs,
            "Loaded API client config from environment"
        );
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "API base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "API base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, defaults::API_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let config = ClientConfig {
            base_url: String::new(),
            ..ClientConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = ClientConfig {
            base_url: "ftp://example.org".to_string(),
            ..ClientConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must start with http"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_error_converts_to_core_error() {
        let err: grove_core::Error = ConfigError::Validation("bad".to_string()).into();
        assert!(matches!(err, grove_core::Error::Config(_)));
    }
}
