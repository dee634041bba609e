use crate::config::GuardConfig;

/// RequestContext
///
/// The transient input of a single guard evaluation: the request path and whether
/// the caller's session resolved. Built per request and dropped after the decision.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_authenticated: bool,
}

/// GuardDecision
///
/// Outcome of evaluating a request against the route policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request reach its handler unmodified.
    Continue,
    /// Send the caller elsewhere. Holds the target path, not yet joined to an origin.
    Redirect(String),
}

/// RouteGuard
///
/// Pure route protection policy. Holds no mutable state and performs no I/O;
/// session resolution happens before `evaluate` is called.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    protected_prefixes: Vec<String>,
    auth_prefixes: Vec<String>,
    bypass_patterns: Vec<String>,
    login_path: String,
    landing_path: String,
}

impl RouteGuard {
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            protected_prefixes: config.protected_prefixes.clone(),
            auth_prefixes: config.auth_prefixes.clone(),
            bypass_patterns: config.bypass_patterns.clone(),
            login_path: config.login_path.clone(),
            landing_path: config.landing_path.clone(),
        }
    }

    /// is_bypassed
    ///
    /// True when the path is exempt from evaluation entirely (API routes, static
    /// assets, favicon). Callers must check this before consulting the session oracle.
    pub fn is_bypassed(&self, path: &str) -> bool {
        starts_with_any(path, &self.bypass_patterns)
    }

    pub fn is_protected(&self, path: &str) -> bool {
        starts_with_any(path, &self.protected_prefixes)
    }

    pub fn is_auth_page(&self, path: &str) -> bool {
        starts_with_any(path, &self.auth_prefixes)
    }

    /// evaluate
    ///
    /// Applies the two access rules as independent predicates, protected rule first.
    /// A path under both a protected and an auth-page prefix is decided by the
    /// protected rule alone.
    pub fn evaluate(&self, ctx: &RequestContext<'_>) -> GuardDecision {
        let protected = self.is_protected(ctx.path);

        if protected && !ctx.is_authenticated {
            return GuardDecision::Redirect(self.login_path.clone());
        }

        if !protected && self.is_auth_page(ctx.path) && ctx.is_authenticated {
            return GuardDecision::Redirect(self.landing_path.clone());
        }

        GuardDecision::Continue
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(&GuardConfig::default())
    }
}

fn starts_with_any(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}
