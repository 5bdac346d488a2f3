//! Question routes.
//!
//! - `POST  /questions`              → Submit a question (broadcasts `new_question`)
//! - `GET   /questions`              → List all questions in dashboard order
//! - `PATCH /questions/{id}`         → Triage update: status and/or answer
//!   (authenticated; broadcasts `question_updated`, answered questions fire
//!   the webhook callout)
//! - `POST  /questions/suggest`      → Suggest an answer for arbitrary text
//! - `GET   /questions/{id}/suggest` → Suggest an answer for a stored question

use axum::{
    Router,
    routing::{get, patch, post},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod patch;
pub mod post;

use get::{list_questions, suggest_for_question};
use patch::update_question;
use post::{create_question, suggest_answer};

pub fn questions_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_question).get(list_questions))
        .route("/suggest", post(suggest_answer))
        .route("/{question_id}", patch(update_question))
        .route("/{question_id}/suggest", get(suggest_for_question))
}
