//! HTTP route entry point for `/api/...`.
//!
//! Route groups include:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Registration, login, and whoami
//! - `/questions` → Question submission, listing, triage updates, and
//!   answer suggestions

use crate::routes::{auth::auth_routes, health::health_routes, questions::questions_routes};
use axum::Router;
use util::state::AppState;

pub mod auth;
pub mod common;
pub mod health;
pub mod questions;

/// Builds the router for all HTTP endpoints under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/questions", questions_routes())
}
