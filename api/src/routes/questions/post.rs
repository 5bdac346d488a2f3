use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::question::Model as QuestionModel;
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use crate::routes::questions::common::{QuestionResponse, SuggestionResponse};
use crate::services::suggest;
use crate::ws::events;

#[derive(Debug, Deserialize, Validate)]
pub struct QuestionCreateRequest {
    #[validate(length(min = 1, message = "Question cannot be empty"))]
    pub message: String,

    pub user_id: Option<i64>,
}

/// POST /questions
///
/// Submit a new question. The question starts `Pending`; on success every
/// connected dashboard client receives a `new_question` event carrying the
/// stored representation.
///
/// ### Responses
/// - `201 Created` with the stored question
/// - `400 Bad Request` on an empty or whitespace-only message
pub async fn create_question(
    State(app_state): State<AppState>,
    Json(req): Json<QuestionCreateRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<QuestionResponse>::error(error_message)),
        );
    }
    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<QuestionResponse>::error(
                "Question cannot be empty",
            )),
        );
    }

    match QuestionModel::create(app_state.db(), &req.message, req.user_id).await {
        Ok(question) => {
            let response = QuestionResponse::from(question);
            // The row is committed; fan the new state out to the dashboards.
            events::question_created(app_state.ws(), response.clone()).await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    response,
                    "Question submitted successfully",
                )),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<QuestionResponse>::error(e.to_string())),
        ),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SuggestRequest {
    #[validate(length(min = 1, message = "Question cannot be empty"))]
    pub message: String,
}

/// POST /questions/suggest
///
/// Produce a candidate answer for arbitrary question text. Suggestion-engine
/// failures degrade to the `unavailable` sentinel rather than an error.
pub async fn suggest_answer(Json(req): Json<SuggestRequest>) -> impl IntoResponse {
    if req.validate().is_err() || req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<SuggestionResponse>::error(
                "Question cannot be empty",
            )),
        );
    }

    let outcome = suggest::suggest_answer(&req.message).await;
    let response = SuggestionResponse::from_outcome(outcome);
    let message = if response.suggested_answer.is_some() {
        "Suggestion generated"
    } else {
        "Suggestion engine is not available"
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(response, message)),
    )
}
