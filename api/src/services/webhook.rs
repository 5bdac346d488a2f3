//! Best-effort webhook callout fired when a question is answered.
//!
//! The callout runs on a spawned task with a hard timeout; it is attempted
//! exactly once and its failure is logged and swallowed. Leaving
//! `WEBHOOK_URL` unset disables it.

use serde::Serialize;
use std::time::Duration;
use util::config;

use crate::routes::questions::common::QuestionResponse;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct AnsweredNotification {
    question_id: i64,
    message: String,
    status: String,
    answered_by: Option<String>,
}

/// Dispatches the answered-question notification without blocking the
/// triggering request. Never fails from the caller's perspective.
pub fn notify_question_answered(question: &QuestionResponse) {
    let url = config::webhook_url();
    if url.is_empty() {
        return;
    }

    let payload = AnsweredNotification {
        question_id: question.id,
        message: question.message.clone(),
        status: question.status.clone(),
        answered_by: question.answered_by.clone(),
    };

    tokio::spawn(async move {
        let client = reqwest::Client::new();
        let result = client
            .post(&url)
            .json(&payload)
            .timeout(WEBHOOK_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(resp) if !resp.status().is_success() => {
                tracing::warn!(
                    question = payload.question_id,
                    status = %resp.status(),
                    "Answered-question webhook was rejected"
                );
            }
            Ok(_) => {
                tracing::debug!(question = payload.question_id, "Answered-question webhook delivered");
            }
            Err(e) => {
                tracing::warn!(
                    question = payload.question_id,
                    error = %e,
                    "Answered-question webhook failed"
                );
            }
        }
    });
}
