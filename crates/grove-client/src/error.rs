//! Classification of admin API failures.

use grove_core::Error;

/// Admin API error classes, derived from the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Missing or rejected credentials (401/403).
    Unauthorized,
    /// Resource does not exist (404).
    NotFound,
    /// Rate limit exceeded (429).
    RateLimited,
    /// Server-side failure (5xx).
    ServerError,
    /// Anything else.
    Unknown,
}

impl ApiErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ServerError)
    }
}

/// Convert an API failure into a grove Error.
pub fn to_grove_error(code: ApiErrorCode, message: &str) -> Error {
    match code {
        ApiErrorCode::Unauthorized => Error::Config(format!("Authentication failed: {}", message)),
        ApiErrorCode::NotFound => Error::NotFound(message.to_string()),
        ApiErrorCode::RateLimited => Error::Request(format!("Rate limit exceeded: {}", message)),
        ApiErrorCode::ServerError => Error::Request(format!("Server error: {}", message)),
        ApiErrorCode::Unknown => Error::Request(message.to_string()),
    }
}
