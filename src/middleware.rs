use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use url::Url;

use crate::{
    AppState,
    guard::{GuardDecision, RequestContext},
};

/// route_guard
///
/// Page-level access control applied to every route. Bypassed paths go straight to
/// the handler without touching the session oracle. Everything else is classified
/// by `RouteGuard` and either passed through or answered with a `302 Found`.
///
/// A session that fails to resolve counts as signed out, so protected pages fail closed.
pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    if state.guard.is_bypassed(&path) {
        tracing::trace!(%path, "route guard bypassed");
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();

    let is_authenticated = match state.sessions.resolve(&parts.headers).await {
        Ok(session) => session.is_some(),
        Err(e) => {
            tracing::warn!(%path, error = %e, "session resolution failed, treating caller as signed out");
            false
        }
    };

    let ctx = RequestContext {
        path: &path,
        is_authenticated,
    };

    match state.guard.evaluate(&ctx) {
        GuardDecision::Continue => next.run(Request::from_parts(parts, body)).await,
        GuardDecision::Redirect(target) => {
            let location =
                redirect_location(&parts, state.config.public_url.as_deref(), &target);
            tracing::info!(%path, %location, is_authenticated, "route guard redirect");
            found(&location)
        }
    }
}

/// redirect_location
///
/// Joins the target path onto the request origin. Falls back to the bare target
/// path when no origin can be determined.
pub fn redirect_location(parts: &Parts, public_url: Option<&str>, target: &str) -> String {
    request_origin(parts, public_url)
        .and_then(|origin| origin.join(target).ok())
        .map(String::from)
        .unwrap_or_else(|| target.to_string())
}

/// request_origin
///
/// The configured public URL wins. Otherwise the host comes from the URI authority
/// (HTTP/2 `:authority`) or the `Host` header, and the scheme from the first
/// `x-forwarded-proto` entry, then the URI scheme, then plain `http`.
fn request_origin(parts: &Parts, public_url: Option<&str>) -> Option<Url> {
    if let Some(raw) = public_url {
        match Url::parse(raw) {
            Ok(url) => return Some(url),
            Err(e) => {
                tracing::warn!(public_url = %raw, error = %e, "ignoring unparseable public URL");
            }
        }
    }

    let host = match parts.uri.authority() {
        Some(authority) => authority.as_str(),
        None => parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())?,
    };

    let scheme = forwarded_proto(&parts.headers)
        .or_else(|| parts.uri.scheme_str())
        .unwrap_or("http");

    Url::parse(&format!("{scheme}://{host}")).ok()
}

fn forwarded_proto(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.split(',').next())
        .map(str::trim)
        .filter(|scheme| !scheme.is_empty())
}

fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
