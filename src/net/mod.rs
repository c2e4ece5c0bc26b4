//! Networking modules for the dashboard REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` applies the request policy (base path, CSRF, 401 events),
//! `transport` moves bytes, `error` is the shared error type, and `types`
//! defines the auth wire schema.

pub mod api;
pub mod error;
pub mod transport;
pub mod types;

pub use api::{ApiClient, ApiEvent, ApiResponse};
pub use error::ApiError;
