//! API Error Types
//!
//! Separates transport failures (the request never completed) from
//! application-level failures reported by the backend.

use thiserror::Error;

/// Errors returned by backend API calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Backend unreachable or connection dropped
    #[error("Network error: {0}")]
    Network(String),

    /// No response within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// The backend answered with `success: false` or a non-2xx status.
    /// The message is the backend's own, shown verbatim.
    #[error("{message}")]
    Service { status: u16, message: String },

    /// The response body was not the JSON we expected
    #[error("Invalid response: {0}")]
    Decode(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ApiError {
    /// Whether the request failed before the backend could answer
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout)
    }

    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_builder() {
            ApiError::Client(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
