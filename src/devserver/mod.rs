//! Development server for the dashboard frontend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Serves the built frontend from `dist_dir` and forwards `/api` to the
//! backend so the browser sees one origin and the session cookie and CSRF
//! cookie stay first-party. Only used during local development.


pub mod assets;
pub mod hosts;
pub mod proxy;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::any;
use tower_http::trace::TraceLayer;

use crate::config::DevServerConfig;
use crate::router::RouteTable;

#[derive(Debug, thiserror::Error)]
pub enum DevServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Shared state for dev server handlers. Clone is cheap; everything is Arc-wrapped.
#[derive(Clone)]
pub struct DevServerState {
    pub config: Arc<DevServerConfig>,
    pub routes: Arc<RouteTable>,
    http: reqwest::Client,
}

impl DevServerState {
    /// # Errors
    ///
    /// Returns an error if the proxy HTTP client cannot be built.
    pub fn new(config: DevServerConfig) -> Result<Self, DevServerError> {
        // Redirects and cookies belong to the browser, not the proxy.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| DevServerError::HttpClientBuild(e.to_string()))?;
        Ok(Self { config: Arc::new(config), routes: Arc::new(RouteTable::new()), http })
    }
}

pub fn app(state: DevServerState) -> Router {
    Router::new()
        .route("/api", any(proxy::forward))
        .route("/api/{*rest}", any(proxy::forward))
        .fallback(assets::serve)
        .layer(middleware::from_fn_with_state(state.clone(), hosts::check_host))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `config.bind_addr()` and serve until the process stops.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server loop fails.
pub async fn serve(config: DevServerConfig) -> Result<(), DevServerError> {
    let addr = config.bind_addr();
    let state = DevServerState::new(config)?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| DevServerError::Bind { addr: addr.clone(), source })?;

    tracing::info!(
        %addr,
        upstream = %state.config.api_url,
        dist = %state.config.dist_dir.display(),
        allowed_hosts = ?state.config.allowed_hosts,
        "dev server listening"
    );
    axum::serve(listener, app(state)).await.map_err(DevServerError::Serve)
}
