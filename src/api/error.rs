//! API Client Errors

use thiserror::Error;

/// Errors that can occur when talking to the payroll backend
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Payroll API unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Unavailable
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Request(e)
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
