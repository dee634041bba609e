use starter_portal::{
    config::GuardConfig,
    guard::{GuardDecision, RequestContext, RouteGuard},
};

// --- Helpers ---

fn decide(guard: &RouteGuard, path: &str, is_authenticated: bool) -> GuardDecision {
    guard.evaluate(&RequestContext {
        path,
        is_authenticated,
    })
}

fn redirect(target: &str) -> GuardDecision {
    GuardDecision::Redirect(target.to_string())
}

const PROTECTED_PATHS: &[&str] = &["/dashboard", "/dashboard/settings", "/dashboard/profile/edit"];
const AUTH_PATHS: &[&str] = &["/login", "/register", "/login/callback"];
const OTHER_PATHS: &[&str] = &["/", "/about", "/pricing/plans", "/health"];

// --- Concrete Scenarios ---

#[test]
fn test_signed_out_dashboard_subpage_redirects_to_login() {
    let guard = RouteGuard::default();
    assert_eq!(decide(&guard, "/dashboard/settings", false), redirect("/login"));
}

#[test]
fn test_signed_in_login_redirects_to_dashboard() {
    let guard = RouteGuard::default();
    assert_eq!(decide(&guard, "/login", true), redirect("/dashboard"));
}

#[test]
fn test_signed_out_login_continues() {
    let guard = RouteGuard::default();
    assert_eq!(decide(&guard, "/login", false), GuardDecision::Continue);
}

#[test]
fn test_api_session_path_is_bypassed() {
    let guard = RouteGuard::default();
    assert!(guard.is_bypassed("/api/auth/session"));
}

#[test]
fn test_signed_in_root_continues() {
    let guard = RouteGuard::default();
    assert_eq!(decide(&guard, "/", true), GuardDecision::Continue);
}

// --- Policy Properties ---

#[test]
fn test_protected_paths_require_session() {
    let guard = RouteGuard::default();
    for path in PROTECTED_PATHS {
        assert_eq!(decide(&guard, path, false), redirect("/login"), "path {path}");
        assert_eq!(decide(&guard, path, true), GuardDecision::Continue, "path {path}");
    }
}

#[test]
fn test_auth_pages_are_for_signed_out_visitors() {
    let guard = RouteGuard::default();
    for path in AUTH_PATHS {
        assert_eq!(decide(&guard, path, true), redirect("/dashboard"), "path {path}");
        assert_eq!(decide(&guard, path, false), GuardDecision::Continue, "path {path}");
    }
}

#[test]
fn test_unclassified_paths_always_continue() {
    let guard = RouteGuard::default();
    for path in OTHER_PATHS {
        for authed in [true, false] {
            assert_eq!(
                decide(&guard, path, authed),
                GuardDecision::Continue,
                "path {path}, authed {authed}"
            );
        }
    }
}

#[test]
fn test_default_bypass_patterns() {
    let guard = RouteGuard::default();

    for path in [
        "/api/auth/session",
        "/api/health",
        "/_next/static/chunks/main.js",
        "/_next/image",
        "/favicon.ico",
        "/api-docs/openapi.json",
    ] {
        assert!(guard.is_bypassed(path), "{path} should be bypassed");
    }

    for path in ["/", "/dashboard", "/login", "/_next/data/build.json", "/health"] {
        assert!(!guard.is_bypassed(path), "{path} should be evaluated");
    }
}

#[test]
fn test_prefix_match_is_plain_string_prefix() {
    // Same semantics as the path matcher: no segment boundary is required.
    let guard = RouteGuard::default();
    assert!(guard.is_protected("/dashboard-archive"));
    assert!(guard.is_auth_page("/registered-users"));
    assert!(!guard.is_protected("/my/dashboard"));
}

// --- Configuration ---

#[test]
fn test_custom_policy_targets() {
    let config = GuardConfig {
        protected_prefixes: vec!["/app".to_string(), "/billing".to_string()],
        auth_prefixes: vec!["/signin".to_string()],
        bypass_patterns: vec!["/assets".to_string()],
        login_path: "/signin".to_string(),
        landing_path: "/app/home".to_string(),
    };
    let guard = RouteGuard::new(&config);

    assert_eq!(decide(&guard, "/billing/invoices", false), redirect("/signin"));
    assert_eq!(decide(&guard, "/signin", true), redirect("/app/home"));
    // The defaults no longer apply.
    assert_eq!(decide(&guard, "/dashboard", false), GuardDecision::Continue);
    assert!(guard.is_bypassed("/assets/logo.svg"));
    assert!(!guard.is_bypassed("/api/auth/session"));
}

#[test]
fn test_overlapping_prefixes_protected_rule_wins() {
    let config = GuardConfig {
        protected_prefixes: vec!["/account".to_string()],
        auth_prefixes: vec!["/account/login".to_string()],
        ..GuardConfig::default()
    };
    let guard = RouteGuard::new(&config);

    assert!(guard.is_protected("/account/login"));
    assert!(guard.is_auth_page("/account/login"));

    assert_eq!(decide(&guard, "/account/login", false), redirect("/login"));
    assert_eq!(decide(&guard, "/account/login", true), GuardDecision::Continue);
}

#[test]
fn test_empty_policy_never_redirects() {
    let config = GuardConfig {
        protected_prefixes: vec![],
        auth_prefixes: vec![],
        bypass_patterns: vec![],
        ..GuardConfig::default()
    };
    let guard = RouteGuard::new(&config);

    for path in ["/", "/dashboard", "/login", "/api/auth/session"] {
        assert!(!guard.is_bypassed(path));
        assert_eq!(decide(&guard, path, false), GuardDecision::Continue);
        assert_eq!(decide(&guard, path, true), GuardDecision::Continue);
    }
}
