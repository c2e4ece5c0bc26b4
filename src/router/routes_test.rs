use super::*;

// =============================================================
// normalize_path
// =============================================================

#[test]
fn normalize_strips_query_fragment_and_trailing_slash() {
    assert_eq!(normalize_path("/servers/"), "/servers");
    assert_eq!(normalize_path("/servers?page=2"), "/servers");
    assert_eq!(normalize_path("/logs#tail"), "/logs");
    assert_eq!(normalize_path("servers"), "/servers");
}

#[test]
fn normalize_root_variants() {
    assert_eq!(normalize_path(""), "/");
    assert_eq!(normalize_path("/"), "/");
    assert_eq!(normalize_path("//"), "/");
    assert_eq!(normalize_path("/?next=/servers"), "/");
}

// =============================================================
// resolve
// =============================================================

#[test]
fn login_is_public_and_standalone() {
    let table = RouteTable::new();
    let route = table.resolve("/login");
    assert_eq!(route.view, View::Login);
    assert_eq!(route.name, Some("Login"));
    assert_eq!(route.layout, None);
    assert!(!route.requires_auth);
    assert!(route.is_login());
}

#[test]
fn root_renders_dashboard_inside_layout() {
    let route = RouteTable::new().resolve("/");
    assert_eq!(route.view, View::Dashboard);
    assert_eq!(route.layout, Some(View::MainLayout));
    assert!(route.requires_auth);
}

#[test]
fn every_layout_child_requires_auth() {
    let table = RouteTable::new();
    let expected = [
        ("/servers", View::Servers),
        ("/caddyfiles", View::Caddyfiles),
        ("/proxies", View::Proxies),
        ("/subscriptions", View::Subscriptions),
        ("/deployments", View::Deployments),
        ("/settings", View::Settings),
        ("/cloudflare-dns", View::CloudflareDns),
        ("/logs", View::Logs),
    ];
    for (path, view) in expected {
        let route = table.resolve(path);
        assert_eq!(route.view, view, "{path}");
        assert_eq!(route.layout, Some(View::MainLayout), "{path}");
        assert!(route.requires_auth, "{path}");
    }
}

#[test]
fn unknown_path_is_not_found_and_public() {
    let route = RouteTable::new().resolve("/nope/deeper");
    assert!(route.is_not_found());
    assert!(!route.requires_auth);
    assert_eq!(route.path, "/nope/deeper");
}

#[test]
fn child_meta_overrides_parent() {
    let mut public = RouteRecord {
        path: "status",
        name: Some("Status"),
        view: View::Logs,
        meta: RouteMeta { requires_auth: Some(false) },
        children: Vec::new(),
    };
    let layout = RouteRecord {
        path: "/",
        name: None,
        view: View::MainLayout,
        meta: RouteMeta { requires_auth: Some(true) },
        children: vec![public.clone()],
    };
    let table = RouteTable::from_records(vec![layout]);
    assert!(!table.resolve("/status").requires_auth);

    public.meta = RouteMeta::default();
    let layout = RouteRecord {
        path: "/",
        name: None,
        view: View::MainLayout,
        meta: RouteMeta { requires_auth: Some(true) },
        children: vec![public],
    };
    assert!(RouteTable::from_records(vec![layout]).resolve("/status").requires_auth);
}

// =============================================================
// paths / is_known
// =============================================================

#[test]
fn paths_lists_full_route_surface() {
    let paths = RouteTable::new().paths();
    assert_eq!(
        paths,
        vec![
            "/login",
            "/",
            "/servers",
            "/caddyfiles",
            "/proxies",
            "/subscriptions",
            "/deployments",
            "/settings",
            "/cloudflare-dns",
            "/logs"
        ]
    );
}

#[test]
fn is_known_matches_table() {
    let table = RouteTable::new();
    assert!(table.is_known("/servers/"));
    assert!(table.is_known("/login?next=/"));
    assert!(!table.is_known("/assets/app.js"));
}
