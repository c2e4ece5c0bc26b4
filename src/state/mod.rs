//! Client-side state.
//!
//! Only the session lives here; domain data is fetched per page and never cached.

pub mod session;

pub use session::{LoginOutcome, Session, SessionStore};
