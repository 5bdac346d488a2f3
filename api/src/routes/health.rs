use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use util::state::AppState;

use crate::response::ApiResponse;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// GET /health
///
/// Liveness probe; carries no data.
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success((), "API is up")))
}
