use crate::{AppState, constants::api, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that answer for signed-in and signed-out callers alike. The session
/// endpoints report state; they never refuse a caller for lacking a session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Monitoring and load balancer checks.
        .route("/health", get(handlers::health))
        // GET /api/auth/session
        // Current session as JSON, `null` when signed out.
        .route(api::AUTH_SESSION, get(handlers::get_session))
        // POST /api/auth/signout
        // Expires the session cookie.
        .route(api::AUTH_SIGNOUT, post(handlers::sign_out))
}
