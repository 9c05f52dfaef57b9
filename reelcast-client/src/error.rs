//! Error types for the provider clients

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling Instagram or Canva
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, TLS, timeout, body read)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Provider returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message extracted from the provider body
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Response parsed but did not contain what the caller needs
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Download exceeded the configured size limit
    #[error("Media exceeds the {limit} byte download limit")]
    TooLarge { limit: u64 },
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }
}
