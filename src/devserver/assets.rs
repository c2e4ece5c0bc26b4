//! Static files from the build output, with history-mode fallback.
//!
//! A path that is not a file but names a page in the route table gets
//! `index.html`, so deep links like `/servers` survive a reload.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use super::DevServerState;

pub async fn serve(State(state): State<DevServerState>, request: Request) -> Response {
    let path = request.uri().path().to_owned();

    let response = match ServeDir::new(&state.config.dist_dir).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    if response.status() != StatusCode::NOT_FOUND {
        return response.into_response();
    }

    if !state.routes.is_known(&path) {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }

    let index = state.config.dist_dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, path = %index.display(), "index.html unavailable");
            (StatusCode::NOT_FOUND, "index.html not found; build the frontend first").into_response()
        }
    }
}
