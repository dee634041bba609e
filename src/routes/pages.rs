use crate::{AppState, constants::pages, handlers};
use axum::{Router, routing::get};

/// Page Router Module
///
/// The HTML pages of the application. Which of them a visitor may see is decided
/// by the route guard before the handler runs:
/// - `/login`, `/register`: signed-out visitors only (signed-in ones go to the dashboard).
/// - `/dashboard/*`: signed-in visitors only (others go to `/login`).
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route(pages::HOME, get(handlers::home_page))
        .route(pages::LOGIN, get(handlers::login_page))
        .route(pages::REGISTER, get(handlers::register_page))
        .route(pages::DASHBOARD, get(handlers::dashboard_page))
        // GET /dashboard/{section}
        // Sub-pages such as `settings` or `profile`.
        .route("/dashboard/{section}", get(handlers::dashboard_section))
}
