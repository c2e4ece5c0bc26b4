//! Session store: who is logged in, and the operations that change it.
//!
//! DESIGN
//! ======
//! The store is an explicit context object shared as `Arc<SessionStore>`.
//! The lock is never held across an `.await`; each operation awaits the
//! request first and then writes the outcome in one short critical section.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, PoisonError, RwLock};

use serde::Deserialize;

use crate::net::types::{ChangePasswordRequest, LoginRequest, ProfileUpdate, User};
use crate::net::{ApiClient, ApiError};

pub const LOGIN_ENDPOINT: &str = "/auth/login/";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout/";
pub const CURRENT_USER_ENDPOINT: &str = "/auth/user/";
pub const UPDATE_USER_ENDPOINT: &str = "/auth/user/update/";
pub const CHANGE_PASSWORD_ENDPOINT: &str = "/auth/user/change-password/";

pub const MALFORMED_LOGIN_RESPONSE: &str = "malformed login response";

/// Snapshot of the client-side session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

/// Result of [`SessionStore::login`]. Failures carry a message for the login form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    Failure { message: String },
}

impl LoginOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { message } => Some(message.as_str()),
        }
    }
}

/// Pick the message shown for a failed login: the server's non-empty
/// `message` field, else the error's own description.
#[must_use]
pub fn login_failure_message(error: &ApiError) -> String {
    error.server_message().map_or_else(|| error.to_string(), str::to_owned)
}

pub struct SessionStore {
    api: Arc<ApiClient>,
    session: RwLock<Session>,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api, session: RwLock::new(Session::default()) }
    }

    #[must_use]
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.session.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read().unwrap_or_else(PoisonError::into_inner).is_authenticated
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.session.read().unwrap_or_else(PoisonError::into_inner).user.clone()
    }

    fn set(&self, user: Option<User>) {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        session.is_authenticated = user.is_some();
        session.user = user;
    }

    /// Drop the in-memory session without contacting the server.
    pub fn reset(&self) {
        self.set(None);
    }

    /// Authenticate with username and password. Never returns an error;
    /// failures come back as [`LoginOutcome::Failure`] and leave the session as it was.
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        let body = match serde_json::to_value(LoginRequest { username, password }) {
            Ok(body) => body,
            Err(e) => return LoginOutcome::Failure { message: e.to_string() },
        };

        let response = match self.api.post(LOGIN_ENDPOINT, Some(body)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "login request failed");
                return LoginOutcome::Failure { message: login_failure_message(&e) };
            }
        };

        // Malformed: `user` absent, null, or not an object.
        let user = response
            .data
            .get("user")
            .filter(|u| !u.is_null())
            .and_then(|u| User::deserialize(u).ok());
        match user {
            Some(user) => {
                tracing::info!(user_id = ?user.id, "logged in");
                self.set(Some(user));
                LoginOutcome::Success
            }
            None => LoginOutcome::Failure { message: MALFORMED_LOGIN_RESPONSE.to_owned() },
        }
    }

    /// End the session. The local session is cleared whatever the server says;
    /// the request result is returned for callers that want to report it.
    ///
    /// # Errors
    ///
    /// Returns the logout request's error, after the session has been cleared.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.api.post(LOGOUT_ENDPOINT, None).await.map(|_| ());
        if let Err(e) = &result {
            tracing::warn!(error = %e, "logout request failed");
        }
        self.reset();
        result
    }

    /// Load the current user. Any failure, including an unreadable body,
    /// leaves the session unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error after clearing the session.
    pub async fn fetch_user(&self) -> Result<User, ApiError> {
        match self.api.get(CURRENT_USER_ENDPOINT).await.and_then(|r| r.json::<User>()) {
            Ok(user) => {
                self.set(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Update the current user's profile and store the returned record.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error; the session is left unchanged.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let body = serde_json::to_value(update).map_err(|e| ApiError::Encode(e.to_string()))?;
        let response = self.api.put(UPDATE_USER_ENDPOINT, Some(body)).await?;
        // Accept both a bare user record and `{ "user": {...} }`.
        let record = response.data.get("user").cloned().unwrap_or(response.data);
        let user = User::deserialize(&record).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.set(Some(user.clone()));
        Ok(user)
    }

    /// Change the current user's password. The session is not modified.
    ///
    /// # Errors
    ///
    /// Returns the request error, e.g. a 400 when the old password is wrong.
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<(), ApiError> {
        let body = serde_json::to_value(ChangePasswordRequest { old_password, new_password })
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        self.api.post(CHANGE_PASSWORD_ENDPOINT, Some(body)).await?;
        Ok(())
    }
}
