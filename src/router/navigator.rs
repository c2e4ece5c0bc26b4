//! In-app navigation: current location, history, and hard redirects.
//!
//! DESIGN
//! ======
//! `navigate` resolves the target, runs the guard, and follows guard
//! redirects. `apply_events` drains `ApiEvent`s from the API client; an
//! `Unauthorized` event forces a hard redirect to `/login`, which bypasses
//! the guard and drops all in-memory client state the way a full page load
//! would.

#[cfg(test)]
#[path = "navigator_test.rs"]
mod navigator_test;

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use super::guard::{AuthGuard, GuardDecision};
use super::routes::{LOGIN_PATH, ResolvedRoute, RouteTable};
use crate::net::ApiEvent;
use crate::state::SessionStore;

/// Redirect hops followed after the first guard check before giving up.
/// With the default table a navigation settles within one hop.
const MAX_REDIRECTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("too many redirects navigating to {0}")]
    RedirectLoop(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Landed on the requested route.
    Arrived(ResolvedRoute),
    /// The guard sent the navigation elsewhere.
    Redirected { requested: String, route: ResolvedRoute },
}

impl NavigationOutcome {
    #[must_use]
    pub fn route(&self) -> &ResolvedRoute {
        match self {
            Self::Arrived(route) | Self::Redirected { route, .. } => route,
        }
    }
}

pub struct Navigator {
    routes: RouteTable,
    guard: AuthGuard,
    session: Arc<SessionStore>,
    events: broadcast::Receiver<ApiEvent>,
    current: Option<ResolvedRoute>,
    history: Vec<String>,
    hard_reloads: usize,
}

impl Navigator {
    #[must_use]
    pub fn new(routes: RouteTable, session: Arc<SessionStore>) -> Self {
        let events = session.api().subscribe();
        Self {
            routes,
            guard: AuthGuard::new(session.clone()),
            session,
            events,
            current: None,
            history: Vec::new(),
            hard_reloads: 0,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&ResolvedRoute> {
        self.current.as_ref()
    }

    /// Paths visited since the last hard redirect, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    #[must_use]
    pub fn hard_reloads(&self) -> usize {
        self.hard_reloads
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Navigate to `path`, following guard redirects.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::RedirectLoop` if redirects do not settle.
    pub async fn navigate(&mut self, path: &str) -> Result<NavigationOutcome, NavigationError> {
        let requested = self.routes.resolve(path);
        let mut target = requested.clone();

        for _ in 0..=MAX_REDIRECTS {
            match self.guard.check(&target).await {
                GuardDecision::Proceed => {
                    self.enter(target.clone());
                    return Ok(if target == requested {
                        NavigationOutcome::Arrived(target)
                    } else {
                        tracing::debug!(from = %requested.path, to = %target.path, "navigation redirected");
                        NavigationOutcome::Redirected { requested: requested.path, route: target }
                    });
                }
                GuardDecision::Redirect(next) => target = self.routes.resolve(&next),
            }
        }

        tracing::warn!(path = %requested.path, "navigation redirect loop");
        Err(NavigationError::RedirectLoop(requested.path))
    }

    /// Drain pending API events. Returns how many hard redirects were performed.
    pub fn apply_events(&mut self) -> usize {
        let mut performed = 0;
        loop {
            match self.events.try_recv() {
                Ok(ApiEvent::Unauthorized { path }) => {
                    tracing::info!(%path, "unauthorized response; reloading at login");
                    self.hard_redirect(LOGIN_PATH);
                    performed += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "api event receiver lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return performed,
            }
        }
    }

    /// Full reload at `path`: skips the guard and discards session and history.
    pub fn hard_redirect(&mut self, path: &str) {
        self.session.reset();
        self.history.clear();
        self.hard_reloads += 1;
        let route = self.routes.resolve(path);
        self.enter(route);
    }

    fn enter(&mut self, route: ResolvedRoute) {
        self.history.push(route.path.clone());
        self.current = Some(route);
    }
}
