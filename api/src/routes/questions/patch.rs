use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::question::{Model as QuestionModel, QuestionStatus};
use db::models::user::Model as UserModel;
use serde::Deserialize;
use std::str::FromStr;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::questions::common::QuestionResponse;
use crate::services::webhook;
use crate::ws::events;

#[derive(Debug, Deserialize)]
pub struct QuestionUpdateRequest {
    pub status: Option<String>,
    pub answer: Option<String>,
}

/// PATCH /questions/{question_id}
///
/// Triage update by an authenticated user. `status` and `answer` are both
/// optional; supplying an answer records the caller as `answered_by` in the
/// same write. On success every dashboard client receives a
/// `question_updated` event; moving to `Answered` additionally fires the
/// best-effort webhook callout.
///
/// ### Responses
/// - `200 OK` with the updated question
/// - `401 Unauthorized` on a missing/invalid token
/// - `404 Not Found` for an unknown question id
/// - `422 Unprocessable Entity` for a status outside
///   Pending/Escalated/Answered, or an `Answered` transition with no answer
///   available
pub async fn update_question(
    State(app_state): State<AppState>,
    Path(question_id): Path<i64>,
    AuthUser(claims): AuthUser,
    Json(req): Json<QuestionUpdateRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    // Blank fields are treated as absent, as submitted by the dashboard.
    let answer = req.answer.filter(|a| !a.trim().is_empty());
    let status_text = req.status.filter(|s| !s.trim().is_empty());

    // Strict taxonomy check: only the three known states may be written.
    let status = match status_text {
        Some(text) => match QuestionStatus::from_str(&text) {
            Ok(status) => Some(status),
            Err(_) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ApiResponse::<QuestionResponse>::error(format!(
                        "Unknown status '{}'; expected Pending, Escalated or Answered",
                        text
                    ))),
                );
            }
        },
        None => None,
    };

    let question = match QuestionModel::find_by_id(db, question_id).await {
        Ok(Some(question)) => question,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<QuestionResponse>::error("Question not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<QuestionResponse>::error(e.to_string())),
            );
        }
    };

    // A question may only become Answered with an answer supplied in this
    // call or already on record.
    if status == Some(QuestionStatus::Answered) && answer.is_none() && question.answer.is_none() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<QuestionResponse>::error(
                "Cannot mark a question as Answered without an answer",
            )),
        );
    }

    let actor = match UserModel::get_by_id(db, claims.sub).await {
        Ok(Some(user)) => user.username,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<QuestionResponse>::error("User no longer exists")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<QuestionResponse>::error(e.to_string())),
            );
        }
    };

    let answered = status == Some(QuestionStatus::Answered);

    match question.apply_update(db, status, answer, &actor).await {
        Ok(updated) => {
            let response = QuestionResponse::from(updated);

            if answered {
                webhook::notify_question_answered(&response);
            }
            // The update is committed; fan the new state out to the dashboards.
            events::question_updated(app_state.ws(), response.clone()).await;

            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    response,
                    "Question updated successfully",
                )),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<QuestionResponse>::error(e.to_string())),
        ),
    }
}
