//! # myx-console
//!
//! Client side of the MyX administration dashboard: the authenticated REST
//! client, the session store, the route table with its auth guard, and the
//! development server that serves the built frontend and proxies `/api`.
//!
//! The backend (sessions, CSRF issuance, domain resources) lives elsewhere;
//! this crate only talks to it.

pub mod config;
pub mod devserver;
pub mod net;
pub mod router;
pub mod state;
