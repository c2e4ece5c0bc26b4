use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use serde_json::json;

use super::*;
use crate::net::{ApiClient, ApiEvent};

/// Backend stand-in: issues a CSRF cookie and token, echoes cookies and the
/// CSRF header on every other path, and rejects `/api/private/` with 401.
async fn spawn_backend() -> String {
    async fn csrf() -> impl IntoResponse {
        (
            [(header::SET_COOKIE, "csrftoken=tok-1; Path=/")],
            axum::Json(json!({"csrfToken": "tok-1"})),
        )
    }

    async fn echo(headers: HeaderMap, body: String) -> impl IntoResponse {
        let header_value =
            |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or_default().to_owned();
        axum::Json(json!({
            "cookie": header_value("cookie"),
            "csrf": header_value("x-csrftoken"),
            "content_type": header_value("content-type"),
            "body": body,
        }))
    }

    async fn private() -> impl IntoResponse {
        (StatusCode::UNAUTHORIZED, axum::Json(json!({"detail": "not authenticated"})))
    }

    let app = Router::new()
        .route("/api/auth/csrf/", get(csrf))
        .route("/api/private/", any(private))
        .route("/api/{*rest}", any(echo));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(origin: &str) -> ClientConfig {
    ClientConfig { api_origin: origin.to_owned(), ..ClientConfig::default() }
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

#[test]
fn origin_without_scheme_is_rejected() {
    let err = ReqwestTransport::new(&config("localhost:8000")).err().unwrap();
    assert!(matches!(err, ApiError::InvalidUrl(ref origin) if origin == "localhost:8000"));
    assert!(matches!(ApiClient::from_config(&config("localhost:8000")), Err(ApiError::InvalidUrl(_))));
}

#[test]
fn http_and_https_origins_are_accepted() {
    assert!(ReqwestTransport::new(&config("http://localhost:8000/")).is_ok());
    assert!(ReqwestTransport::new(&config("https://myx.example.com")).is_ok());
}

// =============================================================================
// WIRE
// =============================================================================

#[tokio::test]
async fn write_carries_session_cookie_and_csrf_header() {
    let origin = spawn_backend().await;
    let client = ApiClient::from_config(&config(&origin)).unwrap();

    let resp = client.post("/servers/", Some(json!({"name": "edge-1"}))).await.unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.data["cookie"], "csrftoken=tok-1");
    assert_eq!(resp.data["csrf"], "tok-1");
    assert_eq!(resp.data["content_type"], "application/json");
    assert_eq!(resp.data["body"], r#"{"name":"edge-1"}"#);
    assert_eq!(client.csrf_token().await.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn read_carries_cookie_without_csrf_header() {
    let origin = spawn_backend().await;
    let client = ApiClient::from_config(&config(&origin)).unwrap();
    client.ensure_csrf_token().await.unwrap();

    let resp = client.get("/servers/").await.unwrap();
    assert_eq!(resp.data["cookie"], "csrftoken=tok-1");
    assert_eq!(resp.data["csrf"], "");
}

#[tokio::test]
async fn wire_401_becomes_unauthorized() {
    let origin = spawn_backend().await;
    let client = ApiClient::from_config(&config(&origin)).unwrap();
    let mut events = client.subscribe();

    let err = client.get("/private/").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(events.try_recv().unwrap(), ApiEvent::Unauthorized { path: "/api/private/".to_owned() });
}

#[tokio::test]
async fn unreachable_origin_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = ReqwestTransport::new(&config(&format!("http://{addr}"))).unwrap();
    let err = transport.send(HttpRequest::new(Method::Get, "/api/auth/user/")).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
