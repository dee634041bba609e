use std::sync::Arc;

use axum::{Router, extract::FromRef, http::HeaderName, middleware::from_fn_with_state};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Session resolution, configuration and the shared schemas.
pub mod auth;
pub mod config;
pub mod constants;
pub mod models;

// Route protection: the pure policy and its axum adapter.
pub mod guard;
pub mod middleware;

pub mod handlers;
pub mod routes;
use routes::{pages, public};

// --- Public Re-exports ---

pub use auth::{JwtSessionOracle, MockSessionOracle, SessionOracle, SessionState};
pub use config::AppConfig;
pub use guard::{GuardDecision, RequestContext, RouteGuard};

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints, served at `/api-docs/openapi.json`.
/// Page routes return HTML and are left out.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::get_session, handlers::sign_out),
    components(schemas(models::User, models::Session)),
    tags(
        (name = "starter-portal", description = "Starter Portal API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, immutable container shared by every request: the injected session
/// oracle, the compiled route policy and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    /// Resolves the caller's session. Swapped for `MockSessionOracle` in tests.
    pub sessions: SessionState,
    /// Route protection policy built from `config.guard`.
    pub guard: Arc<RouteGuard>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig, sessions: SessionState) -> Self {
        Self {
            sessions,
            guard: Arc::new(RouteGuard::new(&config.guard)),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing table, wraps it in the route guard, and applies the
/// observability and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(pages::page_routes())
        // Every route, including the fallback, passes the guard. Bypassed paths
        // are filtered inside the middleware itself.
        .layer(from_fn_with_state(state.clone(), middleware::route_guard))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span with method, URI and the `x-request-id` assigned by
/// `SetRequestIdLayer`, so every log line of a request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
