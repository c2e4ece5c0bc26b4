//! Static route table for the dashboard.
//!
//! DESIGN
//! ======
//! Records nest the way the pages do: `/login` stands alone, every other page
//! is a child of the shared main layout at `/`. `requires_auth` lives in the
//! record meta and children inherit it unless they set their own.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Views a route can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    MainLayout,
    Dashboard,
    Servers,
    Caddyfiles,
    Proxies,
    Subscriptions,
    Deployments,
    Settings,
    CloudflareDns,
    Logs,
    NotFound,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// Absolute for top-level records, relative to the parent for children.
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub view: View,
    pub meta: RouteMeta,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    fn leaf(path: &'static str, name: &'static str, view: View) -> Self {
        Self { path, name: Some(name), view, meta: RouteMeta::default(), children: Vec::new() }
    }
}

/// Outcome of matching a location against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Normalized path (no query, no trailing slash).
    pub path: String,
    pub name: Option<&'static str>,
    pub view: View,
    /// Layout wrapping `view`, when the match is a child route.
    pub layout: Option<View>,
    pub requires_auth: bool,
}

impl ResolvedRoute {
    #[must_use]
    pub fn is_login(&self) -> bool {
        self.path == LOGIN_PATH
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.view == View::NotFound
    }
}

/// Strip query and fragment, collapse trailing slashes, and force a leading `/`.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        HOME_PATH.to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn child_path(parent: &str, child: &str) -> String {
    if child.is_empty() {
        return normalize_path(parent);
    }
    normalize_path(&format!("{}/{child}", parent.trim_end_matches('/')))
}

pub struct RouteTable {
    records: Vec<RouteRecord>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    /// The dashboard's route table.
    #[must_use]
    pub fn new() -> Self {
        let login = RouteRecord {
            path: LOGIN_PATH,
            name: Some("Login"),
            view: View::Login,
            meta: RouteMeta { requires_auth: Some(false) },
            children: Vec::new(),
        };
        let main = RouteRecord {
            path: HOME_PATH,
            name: None,
            view: View::MainLayout,
            meta: RouteMeta { requires_auth: Some(true) },
            children: vec![
                RouteRecord::leaf("", "Dashboard", View::Dashboard),
                RouteRecord::leaf("servers", "Servers", View::Servers),
                RouteRecord::leaf("caddyfiles", "Caddyfiles", View::Caddyfiles),
                RouteRecord::leaf("proxies", "Proxies", View::Proxies),
                RouteRecord::leaf("subscriptions", "Subscriptions", View::Subscriptions),
                RouteRecord::leaf("deployments", "Deployments", View::Deployments),
                RouteRecord::leaf("settings", "Settings", View::Settings),
                RouteRecord::leaf("cloudflare-dns", "CloudflareDNS", View::CloudflareDns),
                RouteRecord::leaf("logs", "Logs", View::Logs),
            ],
        };
        Self::from_records(vec![login, main])
    }

    #[must_use]
    pub fn from_records(records: Vec<RouteRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    /// Match `raw` (which may carry a query string) against the table.
    /// Unmatched paths resolve to `View::NotFound` with no auth requirement.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> ResolvedRoute {
        let path = normalize_path(raw);

        for record in &self.records {
            let parent_auth = record.meta.requires_auth.unwrap_or(false);
            for child in &record.children {
                if child_path(record.path, child.path) == path {
                    return ResolvedRoute {
                        path,
                        name: child.name,
                        view: child.view,
                        layout: Some(record.view),
                        requires_auth: child.meta.requires_auth.unwrap_or(parent_auth),
                    };
                }
            }
            // A record with children only renders through one of them.
            if record.children.is_empty() && normalize_path(record.path) == path {
                return ResolvedRoute {
                    path,
                    name: record.name,
                    view: record.view,
                    layout: None,
                    requires_auth: parent_auth,
                };
            }
        }

        ResolvedRoute { path, name: None, view: View::NotFound, layout: None, requires_auth: false }
    }

    /// Whether `raw` names a page of the app (used for history-mode fallback).
    #[must_use]
    pub fn is_known(&self, raw: &str) -> bool {
        !self.resolve(raw).is_not_found()
    }

    /// Every full path in the table, in declaration order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        for record in &self.records {
            if record.children.is_empty() {
                out.push(normalize_path(record.path));
            }
            out.extend(record.children.iter().map(|c| child_path(record.path, c.path)));
        }
        out
    }
}
