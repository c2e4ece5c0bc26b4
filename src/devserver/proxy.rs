//! `/api` reverse proxy to the backend.
//!
//! The upstream sees its own host in `Host` (the client's is dropped and
//! reqwest fills in the target's). Everything else is relayed as-is apart
//! from hop-by-hop headers.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};

use super::DevServerState;

const MAX_PROXY_BODY_BYTES: usize = 64 * 1024 * 1024;

static HOP_BY_HOP: [header::HeaderName; 8] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::CONTENT_LENGTH,
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}

/// Full upstream URL for a request path (and query) under `api_url`.
#[must_use]
pub fn upstream_url(api_url: &str, path_and_query: &str) -> String {
    format!("{}{path_and_query}", api_url.trim_end_matches('/'))
}

pub async fn forward(State(state): State<DevServerState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let path_and_query = parts.uri.path_and_query().map_or_else(|| parts.uri.path(), |pq| pq.as_str());
    let url = upstream_url(&state.config.api_url, path_and_query);

    let body = match axum::body::to_bytes(body, MAX_PROXY_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => return (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()).into_response(),
    };

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);

    let upstream = state
        .http
        .request(parts.method.clone(), &url)
        .headers(headers)
        .body(body)
        .send()
        .await;

    let upstream = match upstream {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(error = %e, %url, method = %parts.method, "upstream request failed");
            return (StatusCode::BAD_GATEWAY, format!("upstream unavailable: {e}")).into_response();
        }
    };

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);

    match upstream.bytes().await {
        Ok(bytes) => {
            tracing::debug!(%url, status = status.as_u16(), "proxied");
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            *response.headers_mut() = headers;
            response
        }
        Err(e) => {
            tracing::warn!(error = %e, %url, "upstream body read failed");
            (StatusCode::BAD_GATEWAY, format!("upstream body read failed: {e}")).into_response()
        }
    }
}
