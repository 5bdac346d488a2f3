pub mod auth;
pub mod response;
pub mod routes;
pub mod services;
pub mod ws;

use axum::Router;
use util::state::AppState;

/// Builds the complete application router: HTTP endpoints under `/api` and
/// the live event feed under `/ws`.
///
/// Kept separate from `main` so integration tests can drive the exact router
/// the server runs.
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::routes())
        .nest("/ws", ws::ws_routes())
        .with_state(app_state)
}
