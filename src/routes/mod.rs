/// Router Module Index
///
/// Splits the routing table by what the route serves. Access control is not
/// decided here: the route guard middleware classifies every path centrally.

/// JSON API and infrastructure endpoints (`/health`, `/api/auth/*`).
/// The `/api` prefix sits in the guard's default bypass list.
pub mod public;

/// HTML page routes, subject to route guard redirects.
pub mod pages;
