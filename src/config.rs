use std::env;

use url::Url;

use crate::{constants::pages, guard::RouteGuard};

/// Local-only fallback for the session signing secret.
const LOCAL_AUTH_SECRET: &str = "super-secure-test-secret-value-local";

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// immutable afterwards; pulled into handlers and middleware via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the development session bypass and log format.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Public origin (scheme + host) used to build absolute redirect URLs.
    pub public_url: Option<String>,
    // HS256 secret used to verify session tokens.
    pub auth_secret: String,
    // Name of the cookie carrying the session token.
    pub session_cookie: String,
    // Route protection policy.
    pub guard: GuardConfig,
}

/// Env
///
/// Defines the runtime context, switching between development conveniences
/// (header bypass, pretty logs) and hardened production behavior.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// GuardConfig
///
/// Declarative route protection policy consumed by `guard::RouteGuard`.
#[derive(Clone, Debug, PartialEq)]
pub struct GuardConfig {
    /// Prefixes that require an authenticated session.
    pub protected_prefixes: Vec<String>,
    /// Prefixes of login/registration pages, off-limits once signed in.
    pub auth_prefixes: Vec<String>,
    /// Prefixes skipped by the guard entirely.
    pub bypass_patterns: Vec<String>,
    /// Where unauthenticated visitors of protected pages are sent.
    pub login_path: String,
    /// Where signed-in visitors of auth pages are sent.
    pub landing_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec![pages::DASHBOARD.to_string()],
            auth_prefixes: vec![pages::LOGIN.to_string(), pages::REGISTER.to_string()],
            bypass_patterns: vec![
                "/api".to_string(),
                "/_next/static".to_string(),
                "/_next/image".to_string(),
                "/favicon.ico".to_string(),
            ],
            login_path: pages::LOGIN.to_string(),
            landing_path: pages::DASHBOARD.to_string(),
        }
    }
}

impl GuardConfig {
    /// from_env
    ///
    /// Overlays the `GUARD_*` environment variables onto the default policy.
    /// List variables are comma-separated; blank entries are dropped.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            protected_prefixes: list_var("GUARD_PROTECTED_PREFIXES")
                .unwrap_or(defaults.protected_prefixes),
            auth_prefixes: list_var("GUARD_AUTH_PREFIXES").unwrap_or(defaults.auth_prefixes),
            bypass_patterns: list_var("GUARD_BYPASS").unwrap_or(defaults.bypass_patterns),
            login_path: env::var("GUARD_LOGIN_PATH").unwrap_or(defaults.login_path),
            landing_path: env::var("GUARD_LANDING_PATH").unwrap_or(defaults.landing_path),
        }
    }
}

/// GuardConfigError
///
/// A route policy that would send visitors in circles or could never match.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum GuardConfigError {
    #[error("{setting} entry {value:?} must start with '/'")]
    NotAbsolute { setting: &'static str, value: String },
    #[error("login path {0:?} is itself protected; signed-out visitors would redirect to it forever")]
    LoginPathProtected(String),
    #[error("landing path {0:?} is an auth page; signed-in visitors would redirect to it forever")]
    LandingPathIsAuthPage(String),
}

impl GuardConfig {
    /// validate
    ///
    /// Every prefix and target must be an absolute path, the login path must be
    /// reachable while signed out and the landing path while signed in.
    pub fn validate(&self) -> Result<(), GuardConfigError> {
        let lists = [
            ("GUARD_PROTECTED_PREFIXES", &self.protected_prefixes),
            ("GUARD_AUTH_PREFIXES", &self.auth_prefixes),
            ("GUARD_BYPASS", &self.bypass_patterns),
        ];
        let single = [
            ("GUARD_LOGIN_PATH", &self.login_path),
            ("GUARD_LANDING_PATH", &self.landing_path),
        ];

        let entries = lists
            .into_iter()
            .flat_map(|(setting, values)| values.iter().map(move |value| (setting, value)))
            .chain(single);

        for (setting, value) in entries {
            if !value.starts_with('/') {
                return Err(GuardConfigError::NotAbsolute {
                    setting,
                    value: value.clone(),
                });
            }
        }

        let guard = RouteGuard::new(self);
        if guard.is_protected(&self.login_path) {
            return Err(GuardConfigError::LoginPathProtected(self.login_path.clone()));
        }
        if guard.is_auth_page(&self.landing_path) && !guard.is_protected(&self.landing_path) {
            return Err(GuardConfigError::LandingPathIsAuthPage(
                self.landing_path.clone(),
            ));
        }

        Ok(())
    }
}

fn list_var(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    })
}

impl Default for AppConfig {
    /// default
    ///
    /// Non-panicking configuration for test setup, no environment access.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:3000".to_string(),
            public_url: None,
            auth_secret: LOCAL_AUTH_SECRET.to_string(),
            session_cookie: "session-token".to_string(),
            guard: GuardConfig::default(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables, failing fast.
    ///
    /// # Panics
    /// Panics in production when `AUTH_SECRET` is not set, so the server never
    /// starts verifying sessions against a known development secret. Panics in any
    /// environment when `APP_URL` is not a URL or the `GUARD_*` policy fails
    /// `GuardConfig::validate`.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let auth_secret = match env {
            Env::Production => {
                env::var("AUTH_SECRET").expect("FATAL: AUTH_SECRET must be set in production.")
            }
            Env::Local => env::var("AUTH_SECRET").unwrap_or_else(|_| LOCAL_AUTH_SECRET.to_string()),
        };

        let public_url = env::var("APP_URL").ok().filter(|url| !url.trim().is_empty());
        if let Some(url) = &public_url {
            if let Err(e) = Url::parse(url) {
                panic!("FATAL: APP_URL {url:?} is not a valid URL: {e}");
            }
        }

        let guard = GuardConfig::from_env();
        if let Err(e) = guard.validate() {
            panic!("FATAL: invalid route guard policy: {e}");
        }

        Self {
            env,
            bind_addr: env::var("APP_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            public_url,
            auth_secret,
            session_cookie: env::var("SESSION_COOKIE")
                .unwrap_or_else(|_| "session-token".to_string()),
            guard,
        }
    }
}
