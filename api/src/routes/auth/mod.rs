//! Authentication routes.
//!
//! - `POST /auth/register` → Create an account and issue a token
//! - `POST /auth/login`    → Verify credentials and issue a token
//! - `GET  /auth/me`       → Whoami for the bearer of a token

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod get;
pub mod post;

use get::me;
use post::{login, register};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}
