//! `Host` header allow-list, guarding the dev server against DNS rebinding.

#[cfg(test)]
#[path = "hosts_test.rs"]
mod hosts_test;

use std::net::IpAddr;

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::DevServerState;

/// Strip an optional `:port` and IPv6 brackets, lowercasing the rest.
#[must_use]
pub fn host_name(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix('[') {
        return rest.split(']').next().unwrap_or_default().to_ascii_lowercase();
    }
    match raw.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name.to_ascii_lowercase(),
        _ => raw.to_ascii_lowercase(),
    }
}

/// Localhost names and IP literals are always accepted. Other names must be
/// listed; an entry with a leading `.` also admits every subdomain.
#[must_use]
pub fn is_host_allowed(raw: &str, allowed: &[String]) -> bool {
    let host = host_name(raw);
    if host == "localhost" || host.ends_with(".localhost") || host.parse::<IpAddr>().is_ok() {
        return true;
    }
    allowed.iter().any(|entry| match entry.strip_prefix('.') {
        Some(domain) => host == domain || host.ends_with(entry.as_str()),
        None => host == *entry,
    })
}

/// Reject requests whose `Host` is not allowed. Requests without a `Host`
/// header carry nothing to check and pass through; an unreadable one is rejected.
pub async fn check_host(State(state): State<DevServerState>, request: Request, next: Next) -> Response {
    let host = match request.headers().get(header::HOST) {
        Some(value) => match value.to_str() {
            Ok(host) => Some(host.to_owned()),
            Err(_) => {
                tracing::warn!("blocked request with unreadable host header");
                return (StatusCode::FORBIDDEN, "Blocked request. Host header is not valid.").into_response();
            }
        },
        None => request.uri().authority().map(|a| a.as_str().to_owned()),
    };

    match host {
        Some(host) if !is_host_allowed(&host, &state.config.allowed_hosts) => {
            tracing::warn!(%host, "blocked request from disallowed host");
            (
                StatusCode::FORBIDDEN,
                format!("Blocked request. Host \"{}\" is not in the allowed hosts list.", host_name(&host)),
            )
                .into_response()
        }
        _ => next.run(request).await,
    }
}
