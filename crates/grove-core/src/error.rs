//! Error types for grove.

use thiserror::Error;

/// Result type alias using grove's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for grove operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found. The message is safe to show to an operator.
    #[error("{0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The standard "no grower anywhere" error.
    pub fn grower_not_found() -> Self {
        Error::NotFound(crate::defaults::GROWER_NOT_FOUND_MESSAGE.to_string())
    }

    /// Whether this error means the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found_is_bare_message() {
        let err = Error::NotFound("Sorry! No grower info found".to_string());
        assert_eq!(err.to_string(), "Sorry! No grower info found");
    }

    #[test]
    fn test_grower_not_found_uses_default_message() {
        let err = Error::grower_not_found();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), crate::defaults::GROWER_NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("blank identifier".to_string());
        assert_eq!(err.to_string(), "Invalid input: blank identifier");
    }

    #[test]
    fn test_error_display_request() {
        let err = Error::Request("connection refused".to_string());
        assert_eq!(err.to_string(), "Request error: connection refused");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing API URL".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API URL");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
