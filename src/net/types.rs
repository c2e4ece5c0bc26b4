//! Wire types for the dashboard REST API.
//!
//! DESIGN
//! ======
//! Only the auth surface is typed here. Domain resources (servers, proxies,
//! deployments, ...) pass through as `serde_json::Value` because the client
//! keeps no cache of domain data.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// USER
// =============================================================================

/// A user record as returned by `/api/auth/user/` and `/api/auth/login/`.
///
/// Every field is optional so the stored record serializes back to exactly
/// what the server sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Numeric primary key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// ISO-8601 timestamp, server formatted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_joined: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Any fields the server adds beyond the known ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
}

/// Partial profile update. Absent fields are left untouched by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// =============================================================================
// RESPONSE BODIES
// =============================================================================

/// Body of `GET /api/auth/csrf/`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CsrfResponse {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}
