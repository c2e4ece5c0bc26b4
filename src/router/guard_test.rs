use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;

use super::*;
use crate::net::ApiClient;
use crate::net::transport::Method;
use crate::net::transport::test_helpers::{MockTransport, json, network_down};
use crate::router::routes::RouteTable;

/// Store whose `/api/auth/user/` answers with a user while `logged_in` is set.
fn store(logged_in: &Arc<AtomicBool>) -> (Arc<MockTransport>, Arc<SessionStore>) {
    let flag = logged_in.clone();
    let transport = Arc::new(MockTransport::new(move |_| {
        if flag.load(Ordering::SeqCst) {
            json(200, &json!({"id": 1, "username": "admin"}))
        } else {
            json(401, &json!({"detail": "Authentication credentials were not provided."}))
        }
    }));
    let session = Arc::new(SessionStore::new(Arc::new(ApiClient::new(transport.clone()))));
    (transport, session)
}

#[tokio::test]
async fn protected_route_redirects_when_fetch_user_fails() {
    let logged_in = Arc::new(AtomicBool::new(false));
    let (transport, session) = store(&logged_in);
    let guard = AuthGuard::new(session.clone());

    let decision = guard.check(&RouteTable::new().resolve("/servers")).await;
    assert_eq!(decision, GuardDecision::Redirect("/login".to_owned()));
    assert_eq!(transport.count(Method::Get, "/api/auth/user/"), 1);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn protected_route_redirects_on_network_failure() {
    let transport = Arc::new(MockTransport::new(|_| network_down()));
    let session = Arc::new(SessionStore::new(Arc::new(ApiClient::new(transport))));
    let guard = AuthGuard::new(session);

    let decision = guard.check(&RouteTable::new().resolve("/logs")).await;
    assert_eq!(decision, GuardDecision::Redirect("/login".to_owned()));
}

#[tokio::test]
async fn protected_route_proceeds_after_successful_fetch() {
    let logged_in = Arc::new(AtomicBool::new(true));
    let (transport, session) = store(&logged_in);
    let guard = AuthGuard::new(session.clone());

    let decision = guard.check(&RouteTable::new().resolve("/proxies")).await;
    assert_eq!(decision, GuardDecision::Proceed);
    assert!(session.is_authenticated());
    assert_eq!(transport.count(Method::Get, "/api/auth/user/"), 1);
}

#[tokio::test]
async fn authenticated_session_skips_fetch() {
    let logged_in = Arc::new(AtomicBool::new(true));
    let (transport, session) = store(&logged_in);
    session.fetch_user().await.unwrap();
    let guard = AuthGuard::new(session);

    let table = RouteTable::new();
    for path in ["/", "/servers", "/settings"] {
        assert_eq!(guard.check(&table.resolve(path)).await, GuardDecision::Proceed);
    }
    assert_eq!(transport.count(Method::Get, "/api/auth/user/"), 1);
}

#[tokio::test]
async fn login_redirects_home_when_authenticated() {
    let logged_in = Arc::new(AtomicBool::new(true));
    let (_transport, session) = store(&logged_in);
    session.fetch_user().await.unwrap();
    let guard = AuthGuard::new(session);

    let decision = guard.check(&RouteTable::new().resolve("/login")).await;
    assert_eq!(decision, GuardDecision::Redirect("/".to_owned()));
}

#[tokio::test]
async fn login_proceeds_when_anonymous_without_fetching() {
    let logged_in = Arc::new(AtomicBool::new(true));
    let (transport, session) = store(&logged_in);
    let guard = AuthGuard::new(session);

    // `/login` does not require auth, so no lookup happens even if the server has a session.
    let decision = guard.check(&RouteTable::new().resolve("/login")).await;
    assert_eq!(decision, GuardDecision::Proceed);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn unknown_route_proceeds_without_auth() {
    let logged_in = Arc::new(AtomicBool::new(false));
    let (transport, session) = store(&logged_in);
    let guard = AuthGuard::new(session);

    assert_eq!(guard.check(&RouteTable::new().resolve("/missing")).await, GuardDecision::Proceed);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn guard_never_admits_protected_route_while_unauthenticated() {
    let logged_in = Arc::new(AtomicBool::new(false));
    let (_transport, session) = store(&logged_in);
    let guard = AuthGuard::new(session.clone());
    let table = RouteTable::new();

    for path in table.paths() {
        let route = table.resolve(&path);
        let decision = guard.check(&route).await;
        if route.requires_auth {
            assert_ne!(decision, GuardDecision::Proceed, "{path} admitted without session");
        }
        assert!(!session.is_authenticated());
    }
}
