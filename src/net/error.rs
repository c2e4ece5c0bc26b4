//! Errors produced by the API client.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

/// Errors returned from [`crate::net::api::ApiClient`] requests.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered 401. An `ApiEvent::Unauthorized` was already published.
    #[error("request failed with status 401")]
    Unauthorized { body: Value },

    /// The server answered with any other non-success status.
    #[error("request failed with status {status}")]
    Status { status: u16, body: Value },

    /// A success body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// A request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// The configured API origin is not a usable URL.
    #[error("invalid API origin: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server responded at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `message` field of the server's JSON error body, if present.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { body } | Self::Status { body, .. } => {
                body.get("message").and_then(Value::as_str).filter(|m| !m.is_empty())
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
