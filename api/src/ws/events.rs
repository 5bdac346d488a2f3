//! Outbound events on the question feed.
//!
//! Every frame is a JSON object of the form
//! `{"type": "...", "data": {...}}` where `data` carries the full question.
//! Emission happens after the database write commits, so a client that
//! refetches on receipt always observes the broadcast state.

use serde::{Deserialize, Serialize};
use util::ws::WebSocketManager;

use crate::routes::questions::common::QuestionResponse;

/// A change to the question set, as sent to every connected feed client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum QuestionEvent {
    NewQuestion(QuestionResponse),
    QuestionUpdated(QuestionResponse),
}

impl QuestionEvent {
    /// Serializes the event into a wire frame and fans it out.
    async fn emit(self, ws: &WebSocketManager) {
        match serde_json::to_string(&self) {
            Ok(frame) => ws.broadcast(frame).await,
            Err(e) => tracing::error!(error = %e, "failed to serialize question event"),
        }
    }
}

/// Announces a newly created question to all feed clients.
pub async fn question_created(ws: &WebSocketManager, question: QuestionResponse) {
    QuestionEvent::NewQuestion(question).emit(ws).await;
}

/// Announces a triage update (status change or answer) to all feed clients.
pub async fn question_updated(ws: &WebSocketManager, question: QuestionResponse) {
    QuestionEvent::QuestionUpdated(question).emit(ws).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> QuestionResponse {
        QuestionResponse {
            id: 7,
            user_id: Some(3),
            message: "How do I reset my password?".to_string(),
            status: "Pending".to_string(),
            timestamp: "2026-08-25T10:00:00+00:00".to_string(),
            answer: None,
            answered_by: None,
        }
    }

    #[test]
    fn new_question_frame_shape() {
        let event = QuestionEvent::NewQuestion(sample_question());
        let frame: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(frame["type"], "new_question");
        assert_eq!(frame["data"]["id"], 7);
        assert_eq!(frame["data"]["status"], "Pending");
    }

    #[test]
    fn question_updated_frame_shape() {
        let mut question = sample_question();
        question.status = "Answered".to_string();
        question.answer = Some("Use the reset link.".to_string());
        question.answered_by = Some("admin".to_string());

        let event = QuestionEvent::QuestionUpdated(question);
        let frame: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(frame["type"], "question_updated");
        assert_eq!(frame["data"]["answered_by"], "admin");
    }

    #[tokio::test]
    async fn emitted_frames_reach_registered_clients() {
        let manager = WebSocketManager::new();
        let (_id, mut rx) = manager.register().await;

        question_created(&manager, sample_question()).await;

        let frame = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["type"], "new_question");
    }
}
