//! Authentication guard run before every navigation.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;

use super::routes::{HOME_PATH, LOGIN_PATH, ResolvedRoute};
use crate::state::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

pub struct AuthGuard {
    session: Arc<SessionStore>,
}

impl AuthGuard {
    #[must_use]
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    /// Decide whether navigation to `to` may proceed.
    ///
    /// An auth-required target with no session first tries `fetch_user`, so a
    /// reload with a live server session is let through. The decision always
    /// reads the in-memory session after that attempt.
    pub async fn check(&self, to: &ResolvedRoute) -> GuardDecision {
        if to.requires_auth && !self.session.is_authenticated() {
            if let Err(e) = self.session.fetch_user().await {
                tracing::debug!(error = %e, path = %to.path, "current user lookup failed");
            }
        }

        if to.requires_auth && !self.session.is_authenticated() {
            GuardDecision::Redirect(LOGIN_PATH.to_owned())
        } else if to.is_login() && self.session.is_authenticated() {
            GuardDecision::Redirect(HOME_PATH.to_owned())
        } else {
            GuardDecision::Proceed
        }
    }
}
