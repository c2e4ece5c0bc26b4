//! Client-side routing.
//!
//! `routes` is the static table, `guard` decides whether a navigation may
//! proceed, and `navigator` ties both to the session and to the API client's
//! unauthorized events.

pub mod guard;
pub mod navigator;
pub mod routes;

pub use guard::{AuthGuard, GuardDecision};
pub use navigator::{NavigationError, NavigationOutcome, Navigator};
pub use routes::{HOME_PATH, LOGIN_PATH, ResolvedRoute, RouteTable, View};
