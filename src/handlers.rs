use crate::{
    auth::{CurrentSession, SessionState},
    config::AppConfig,
    constants::{APP_DESCRIPTION, APP_NAME, pages},
    models::{ApiResponse, Session},
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse},
};
use cookie::{Cookie, SameSite};

// --- API Handlers ---

/// health
///
/// Liveness check for load balancers.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// get_session
///
/// Returns the caller's session, or JSON `null` when signed out. A credential the
/// oracle rejects is reported as signed out rather than as an error.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses((status = 200, description = "Current session, or null when signed out", body = Session))
)]
pub async fn get_session(
    State(sessions): State<SessionState>,
    headers: HeaderMap,
) -> Json<Option<Session>> {
    match sessions.resolve(&headers).await {
        Ok(session) => Json(session),
        Err(e) => {
            tracing::debug!(error = %e, "session lookup failed, reporting signed out");
            Json(None)
        }
    }
}

/// sign_out
///
/// Expires the session cookie. The token itself stays valid until its `exp`; only the
/// browser's copy is discarded. `data` carries the page the client should navigate to.
#[utoipa::path(
    post,
    path = "/api/auth/signout",
    responses((status = 200, description = "Session cookie cleared", body = ApiResponse<String>))
)]
pub async fn sign_out(State(config): State<AppConfig>) -> impl IntoResponse {
    let mut cookie = Cookie::build((config.session_cookie, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();

    tracing::info!("session cookie cleared");

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie.to_string())],
        Json(ApiResponse {
            data: Some(pages::HOME.to_string()),
            error: None,
            message: Some("Signed out".to_string()),
        }),
    )
}

// --- Page Handlers ---

pub async fn home_page() -> Html<String> {
    render_page(
        APP_NAME,
        &format!(
            "<p>{APP_DESCRIPTION}</p>\n<a href=\"{}\">Sign in</a> <a href=\"{}\">Create an account</a>",
            pages::LOGIN,
            pages::REGISTER
        ),
    )
}

pub async fn login_page() -> Html<String> {
    render_page(
        "Sign in",
        &format!(
            "<p>Sign in to continue.</p>\n<a href=\"{}\">Create an account</a>",
            pages::REGISTER
        ),
    )
}

pub async fn register_page() -> Html<String> {
    render_page(
        "Create an account",
        &format!(
            "<p>Register to get started.</p>\n<a href=\"{}\">Already registered? Sign in</a>",
            pages::LOGIN
        ),
    )
}

/// dashboard_page
///
/// The guard already redirects signed-out visitors; `CurrentSession` still rejects
/// them with 401 if the guard is bypassed or misconfigured.
pub async fn dashboard_page(CurrentSession(session): CurrentSession) -> Html<String> {
    render_page(
        "Dashboard",
        &format!("<p>Welcome back, {}.</p>", escape_html(display_name(&session))),
    )
}

pub async fn dashboard_section(
    CurrentSession(session): CurrentSession,
    Path(section): Path<String>,
) -> Html<String> {
    render_page(
        &format!("Dashboard / {}", escape_html(&section)),
        &format!("<p>Signed in as {}.</p>", escape_html(display_name(&session))),
    )
}

// --- Rendering Helpers ---

fn display_name(session: &Session) -> &str {
    session
        .user
        .name
        .as_deref()
        .or(session.user.email.as_deref())
        .unwrap_or(&session.user.id)
}

fn render_page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title} | {APP_NAME}</title></head>\n<body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n"
    ))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
