use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use cookie::Cookie;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    models::{Session, User},
};

/// Header accepted as a stand-in for a session token in `Env::Local`.
pub const DEV_USER_HEADER: &str = "x-user-id";

/// Claims
///
/// Payload of a session token. The identity provider signs it; this server only
/// verifies the signature and the expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user id.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar URL, surfaced as `User::image`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Expiration Time (exp): seconds since the epoch.
    pub exp: usize,
    /// Issued At (iat): seconds since the epoch.
    pub iat: usize,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Session {
            user: User {
                id: claims.sub,
                name: claims.name,
                email: claims.email,
                image: claims.picture,
            },
            expires: DateTime::from_timestamp(claims.exp as i64, 0).unwrap_or_default(),
        }
    }
}

/// SessionError
///
/// Why a presented credential could not be turned into a session. Callers that only
/// need a yes/no answer treat every variant as "not authenticated".
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("session backend unavailable: {0}")]
    Unavailable(String),
}

/// SessionOracle
///
/// Answers "who, if anyone, is making this request?". Injected through application
/// state so the route guard and handlers never reach for global auth configuration.
///
/// `Ok(None)` means no credentials were presented at all.
#[async_trait]
pub trait SessionOracle: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError>;
}

/// SessionState
///
/// The shared handle to the session oracle stored in `AppState`.
pub type SessionState = Arc<dyn SessionOracle>;

/// JwtSessionOracle
///
/// Resolves sessions from an HS256-signed token carried in the session cookie or,
/// failing that, an `Authorization: Bearer` header.
#[derive(Clone)]
pub struct JwtSessionOracle {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
    dev_bypass: bool,
}

impl JwtSessionOracle {
    pub fn new(secret: &str, cookie_name: impl Into<String>) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            cookie_name: cookie_name.into(),
            dev_bypass: false,
        }
    }

    /// from_config
    ///
    /// Builds the oracle from the loaded configuration. The `x-user-id` development
    /// bypass is only ever enabled for `Env::Local`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.auth_secret, config.session_cookie.clone())
            .with_dev_bypass(config.env == Env::Local)
    }

    pub fn with_dev_bypass(mut self, enabled: bool) -> Self {
        self.dev_bypass = enabled;
        self
    }

    fn dev_session(&self, headers: &HeaderMap) -> Option<Session> {
        let user_id = headers
            .get(DEV_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw).ok())?;

        Some(Session {
            user: User {
                id: user_id.to_string(),
                name: Some("Local Developer".to_string()),
                ..User::default()
            },
            expires: Utc::now() + Duration::hours(1),
        })
    }

    fn token(&self, headers: &HeaderMap) -> Option<String> {
        session_cookie(headers, &self.cookie_name).or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_string)
        })
    }
}

#[async_trait]
impl SessionOracle for JwtSessionOracle {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        if self.dev_bypass {
            if let Some(session) = self.dev_session(headers) {
                return Ok(Some(session));
            }
        }

        let Some(token) = self.token(headers) else {
            return Ok(None);
        };

        let token_data = decode::<Claims>(&token, &self.decoding_key, &self.validation)?;
        Ok(Some(token_data.claims.into()))
    }
}

/// session_cookie
///
/// Finds the named cookie across all `Cookie` headers. Unparseable pairs are skipped.
fn session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| Cookie::parse(pair.trim()).ok())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// MockSessionOracle
///
/// Test double returning a canned session (or a simulated backend failure) and
/// counting how many times it was consulted. Clones share the counter.
#[derive(Clone, Default)]
pub struct MockSessionOracle {
    pub session: Option<Session>,
    pub should_fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockSessionOracle {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionOracle for MockSessionOracle {
    async fn resolve(&self, _headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(SessionError::Unavailable(
                "Mock Session Error: Simulation requested".to_string(),
            ));
        }

        Ok(self.session.clone())
    }
}

/// CurrentSession
///
/// Extractor for handlers that need the signed-in user. Rejects with 401 when the
/// oracle finds no usable session, independently of the route guard's redirect.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    SessionState: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionState::from_ref(state);

        match sessions.resolve(&parts.headers).await {
            Ok(Some(session)) => Ok(CurrentSession(session)),
            Ok(None) => Err(StatusCode::UNAUTHORIZED),
            Err(e) => {
                tracing::debug!(error = %e, "session rejected by oracle");
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}
