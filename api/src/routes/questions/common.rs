use db::models::question::Model as QuestionModel;
use serde::{Deserialize, Serialize};

use crate::services::suggest::Suggestion;

/// Full representation of a question, shared by REST responses and
/// WebSocket event payloads.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuestionResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub message: String,
    pub status: String,
    pub timestamp: String,
    pub answer: Option<String>,
    pub answered_by: Option<String>,
}

impl From<QuestionModel> for QuestionResponse {
    fn from(question: QuestionModel) -> Self {
        Self {
            id: question.id,
            user_id: question.user_id,
            message: question.message,
            status: question.status.to_string(),
            timestamp: question.timestamp.to_rfc3339(),
            answer: question.answer,
            answered_by: question.answered_by,
        }
    }
}

/// Outcome of a suggestion request; `source` is `rag`, `simple`, or
/// `unavailable`.
#[derive(Debug, Serialize, Default)]
pub struct SuggestionResponse {
    pub suggested_answer: Option<String>,
    pub source: String,
}

impl SuggestionResponse {
    pub fn from_outcome(outcome: Option<Suggestion>) -> Self {
        match outcome {
            Some(suggestion) => Self {
                suggested_answer: Some(suggestion.text),
                source: suggestion.source.as_str().to_string(),
            },
            None => Self {
                suggested_answer: None,
                source: "unavailable".to_string(),
            },
        }
    }
}
