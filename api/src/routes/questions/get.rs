use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::question::Model as QuestionModel;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::questions::common::{QuestionResponse, SuggestionResponse};
use crate::services::suggest;

/// GET /questions
///
/// All questions in dashboard order: `Escalated` items first, then newest
/// first.
pub async fn list_questions(State(app_state): State<AppState>) -> impl IntoResponse {
    match QuestionModel::list_for_dashboard(app_state.db()).await {
        Ok(questions) => {
            let response: Vec<QuestionResponse> =
                questions.into_iter().map(QuestionResponse::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    response,
                    "Questions fetched successfully",
                )),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Vec<QuestionResponse>>::error(e.to_string())),
        ),
    }
}

/// GET /questions/{question_id}/suggest
///
/// Produce a candidate answer for a stored question.
///
/// ### Responses
/// - `200 OK` with the suggestion or the `unavailable` sentinel
/// - `404 Not Found` for an unknown question id
pub async fn suggest_for_question(
    State(app_state): State<AppState>,
    Path(question_id): Path<i64>,
) -> impl IntoResponse {
    let question = match QuestionModel::find_by_id(app_state.db(), question_id).await {
        Ok(Some(question)) => question,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<SuggestionResponse>::error(
                    "Question not found",
                )),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<SuggestionResponse>::error(e.to_string())),
            );
        }
    };

    let outcome = suggest::suggest_answer(&question.message).await;
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
