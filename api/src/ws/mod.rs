//! WebSocket endpoints for the live question feed.

pub mod events;
pub mod handlers;

use axum::{Router, routing::get};
use util::state::AppState;

use handlers::question_feed_handler;

/// Builds the `/ws` route tree.
pub fn ws_routes() -> Router<AppState> {
    Router::new().route("/questions", get(question_feed_handler))
}
