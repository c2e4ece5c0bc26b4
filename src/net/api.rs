//! Authenticated REST client for the dashboard backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every call goes to `/api/...` with the session cookie attached by the
//! transport. Write verbs carry the `X-CSRFToken` header, fetched lazily from
//! `/api/auth/csrf/` and cached for the lifetime of the client.
//!
//! ERROR HANDLING
//! ==============
//! A failed token fetch is logged and the write request goes out without the
//! header. A 401 on any response publishes `ApiEvent::Unauthorized` once and
//! still returns `ApiError::Unauthorized` to the caller; navigation is left to
//! whoever subscribes (see `router::Navigator`).

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, broadcast};

use super::error::ApiError;
use super::transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
use super::types::CsrfResponse;
use crate::config::ClientConfig;

pub const API_BASE_PATH: &str = "/api";
pub const CSRF_ENDPOINT: &str = "/api/auth/csrf/";
pub const CSRF_HEADER: &str = "X-CSRFToken";

const EVENT_CHANNEL_CAPACITY: usize = 16;

// =============================================================================
// EVENTS
// =============================================================================

/// Notifications published by the client for the composing application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiEvent {
    /// The server rejected the session on `path` (full `/api/...` path).
    Unauthorized { path: String },
}

// =============================================================================
// RESPONSE
// =============================================================================

/// A successful response with its body decoded as JSON.
///
/// Empty bodies decode to `Value::Null`; non-JSON bodies are kept as a string.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

impl ApiResponse {
    /// Decode `data` into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        T::deserialize(&self.data).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

pub(crate) fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()))
}

pub(crate) fn join_path(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') { format!("{base}{path}") } else { format!("{base}/{path}") }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_path: String,
    csrf_token: Mutex<Option<String>>,
    events: broadcast::Sender<ApiEvent>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { transport, base_path: API_BASE_PATH.to_owned(), csrf_token: Mutex::new(None), events }
    }

    /// Build a client backed by a cookie-carrying reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be constructed.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Subscribe to client events. Events published before subscribing are not replayed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ApiEvent> {
        self.events.subscribe()
    }

    /// The cached CSRF token, without fetching.
    pub async fn csrf_token(&self) -> Option<String> {
        self.csrf_token.lock().await.clone()
    }

    /// Return the cached CSRF token, fetching it on first use.
    ///
    /// The lock is held across the fetch so concurrent writers share one
    /// request. A failed fetch leaves the cache empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the token endpoint cannot be reached, answers with
    /// a non-success status, or omits the token or sends it empty.
    pub async fn ensure_csrf_token(&self) -> Result<String, ApiError> {
        let mut cached = self.csrf_token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let response = self.transport.send(HttpRequest::new(Method::Get, CSRF_ENDPOINT)).await?;
        if !(200..300).contains(&response.status) {
            return Err(ApiError::Status { status: response.status, body: parse_body(&response.body) });
        }
        let body: CsrfResponse =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?;
        if body.csrf_token.is_empty() {
            return Err(ApiError::Decode("empty csrfToken".to_owned()));
        }

        *cached = Some(body.csrf_token.clone());
        Ok(body.csrf_token)
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiResponse, ApiError> {
        self.request(Method::Post, path, body).await
    }

    pub async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiResponse, ApiError> {
        self.request(Method::Put, path, body).await
    }

    pub async fn patch(&self, path: &str, body: Option<Value>) -> Result<ApiResponse, ApiError> {
        self.request(Method::Patch, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(Method::Delete, path, None).await
    }

    /// Send `method` to `path` (relative to the base path).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` on 401, `ApiError::Status` on any
    /// other non-2xx status, and `ApiError::Transport` when no response arrives.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse, ApiError> {
        let mut request = HttpRequest::new(method, join_path(&self.base_path, path));
        request.body = body;

        if method.is_write() {
            match self.ensure_csrf_token().await {
                Ok(token) => request.headers.push((CSRF_HEADER.to_owned(), token)),
                Err(e) => {
                    tracing::warn!(error = %e, path = %request.path, "CSRF token fetch failed; sending without token");
                }
            }
        }

        let full_path = request.path.clone();
        let response = self.transport.send(request).await?;
        self.intercept(&full_path, response)
    }

    fn intercept(&self, path: &str, response: HttpResponse) -> Result<ApiResponse, ApiError> {
        let data = parse_body(&response.body);
        match response.status {
            200..=299 => Ok(ApiResponse { status: response.status, data }),
            401 => {
                tracing::info!(%path, "session rejected; publishing unauthorized event");
                // No subscribers is fine; the caller still gets the error.
                let _ = self.events.send(ApiEvent::Unauthorized { path: path.to_owned() });
                Err(ApiError::Unauthorized { body: data })
            }
            status => Err(ApiError::Status { status, body: data }),
        }
    }
}
