//! Configuration parsed from environment variables.
//!
//! `ClientConfig` describes how the API client reaches the backend.
//! `DevServerConfig` replaces the frontend build tool's dev-server settings:
//! listen address, allowed `Host` values, and the `/api` proxy target.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_API_ORIGIN: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_DEV_HOST: &str = "0.0.0.0";
pub const DEFAULT_DEV_PORT: u16 = 5173;
pub const DEFAULT_DIST_DIR: &str = "dist";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Parse { var: &'static str, value: String },
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme + host (+ port) the `/api` paths are resolved against.
    pub api_origin: String,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_origin: DEFAULT_API_ORIGIN.to_owned(), timeouts: Timeouts::default() }
    }
}

impl ClientConfig {
    /// Optional:
    /// - `API_ORIGIN`: default `http://localhost:8000`
    /// - `API_REQUEST_TIMEOUT_SECS`: default 30
    /// - `API_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout is set but is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_origin = env_string("API_ORIGIN")
            .unwrap_or_else(|| DEFAULT_API_ORIGIN.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let timeouts = Timeouts {
            request_secs: env_parse("API_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse("API_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        Ok(Self { api_origin, timeouts })
    }
}

// =============================================================================
// DEV SERVER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevServerConfig {
    pub host: String,
    pub port: u16,
    /// Extra `Host` values accepted besides localhost and IP literals.
    /// A leading `.` matches the domain and all its subdomains.
    pub allowed_hosts: Vec<String>,
    /// Upstream the `/api` prefix is proxied to.
    pub api_url: String,
    /// Directory holding the built frontend (`index.html` + assets).
    pub dist_dir: PathBuf,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DEV_HOST.to_owned(),
            port: DEFAULT_DEV_PORT,
            allowed_hosts: Vec::new(),
            api_url: DEFAULT_API_ORIGIN.to_owned(),
            dist_dir: PathBuf::from(DEFAULT_DIST_DIR),
        }
    }
}

impl DevServerConfig {
    /// Optional:
    /// - `DEV_HOST`: default `0.0.0.0`
    /// - `DEV_PORT`: default 5173
    /// - `VITE_ALLOWED_HOSTS` (or `ALLOWED_HOSTS`): comma-separated host names
    /// - `VITE_API_URL` (or `API_URL`): default `http://localhost:8000`
    /// - `DIST_DIR`: default `dist`
    ///
    /// # Errors
    ///
    /// Returns an error if `DEV_PORT` is set but is not a valid port.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_string("DEV_HOST").unwrap_or_else(|| DEFAULT_DEV_HOST.to_owned()),
            port: env_parse("DEV_PORT", DEFAULT_DEV_PORT)?,
            allowed_hosts: parse_allowed_hosts(env_first(&["VITE_ALLOWED_HOSTS", "ALLOWED_HOSTS"]).as_deref()),
            api_url: env_first(&["VITE_API_URL", "API_URL"])
                .unwrap_or_else(|| DEFAULT_API_ORIGIN.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            dist_dir: env_string("DIST_DIR").map_or_else(|| PathBuf::from(DEFAULT_DIST_DIR), PathBuf::from),
        })
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated host list, trimming entries and dropping empties.
#[must_use]
pub fn parse_allowed_hosts(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_ascii_lowercase)
            .collect()
    })
    .unwrap_or_default()
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// First non-empty value among `keys`, in order.
fn env_first(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env_string(key))
}

fn env_parse<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env_string(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Parse { var: key, value: raw }),
    }
}
