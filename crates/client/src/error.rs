//! HTTP client error types.

use std::sync::Arc;

/// Errors from the upstream HTTP clients.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// eBird token not configured.
    #[error("missing API key: FIELDMARK_EBIRD_API_KEY not set")]
    MissingApiKey,

    /// Request could not be built (bad base URL, empty query).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the upstream service.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response body is not the JSON we expected.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ClientError::Timeout } else { ClientError::Network(Arc::new(err)) }
    }
}
