use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{DeriveActiveEnum, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A submitted helpdesk question in the `questions` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Optional reference to the submitting user.
    pub user_id: Option<i64>,

    pub message: String,

    pub status: QuestionStatus,

    /// Creation time; immutable after insert.
    pub timestamp: DateTime<Utc>,

    /// Username of the user who supplied the answer. Set together with
    /// `answer`, never on its own.
    pub answered_by: Option<String>,

    pub answer: Option<String>,
}

/// Closed set of question lifecycle states.
///
/// `Pending` is assigned at creation; `Answered` is terminal in practice,
/// though nothing forbids a later update from moving away from it. Status
/// strings outside this set are rejected when parsed at the update boundary.
#[derive(
    Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "question_status")]
#[strum(ascii_case_insensitive)]
pub enum QuestionStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,

    #[sea_orm(string_value = "Escalated")]
    Escalated,

    #[sea_orm(string_value = "Answered")]
    Answered,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts a new question with status `Pending` and the current time.
    pub async fn create(
        db: &DbConn,
        message: &str,
        user_id: Option<i64>,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            user_id: Set(user_id),
            message: Set(message.to_owned()),
            status: Set(QuestionStatus::Pending),
            timestamp: Set(Utc::now()),
            answered_by: Set(None),
            answer: Set(None),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// All questions in dashboard order: `Escalated` items first, then by
    /// creation time, newest first.
    pub async fn list_for_dashboard(db: &DbConn) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_desc(Expr::col(Column::Status).eq(QuestionStatus::Escalated))
            .order_by_desc(Column::Timestamp)
            .all(db)
            .await
    }

    /// Applies a triage update to an already-loaded question in one write.
    ///
    /// Supplying an answer records `answered_by` alongside it; an answer on an
    /// already-answered question silently overwrites both fields
    /// (last-writer-wins). Status and answer are independent: either may be
    /// supplied without the other.
    pub async fn apply_update(
        self,
        db: &DbConn,
        status: Option<QuestionStatus>,
        answer: Option<String>,
        actor: &str,
    ) -> Result<Model, DbErr> {
        let mut active_model: ActiveModel = self.into();

        if let Some(status) = status {
            active_model.status = Set(status);
        }
        if let Some(answer) = answer {
            active_model.answer = Set(Some(answer));
            active_model.answered_by = Set(Some(actor.to_owned()));
        }

        active_model.update(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use std::str::FromStr;

    #[tokio::test]
    async fn new_questions_start_pending_and_unanswered() {
        let db = setup_test_db().await;

        let q = Model::create(&db, "How do I reset my password?", None)
            .await
            .unwrap();

        assert_eq!(q.status, QuestionStatus::Pending);
        assert_eq!(q.message, "How do I reset my password?");
        assert!(q.answer.is_none());
        assert!(q.answered_by.is_none());
        assert!(q.user_id.is_none());
    }

    #[tokio::test]
    async fn answering_sets_answer_and_answered_by_together() {
        let db = setup_test_db().await;

        let q = Model::create(&db, "How do I reset my password?", None)
            .await
            .unwrap();
        let updated = q
            .apply_update(
                &db,
                Some(QuestionStatus::Answered),
                Some("Use the reset link".into()),
                "alice",
            )
            .await
            .unwrap();

        assert_eq!(updated.status, QuestionStatus::Answered);
        assert_eq!(updated.answer.as_deref(), Some("Use the reset link"));
        assert_eq!(updated.answered_by.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn reanswering_overwrites_previous_answer() {
        let db = setup_test_db().await;

        let q = Model::create(&db, "VPN keeps dropping", None).await.unwrap();
        let q = q
            .apply_update(
                &db,
                Some(QuestionStatus::Answered),
                Some("Restart the client".into()),
                "alice",
            )
            .await
            .unwrap();
        let q = q
            .apply_update(&db, None, Some("Update to the 2.4 client".into()), "bob")
            .await
            .unwrap();

        assert_eq!(q.answer.as_deref(), Some("Update to the 2.4 client"));
        assert_eq!(q.answered_by.as_deref(), Some("bob"));
        assert_eq!(q.status, QuestionStatus::Answered);
    }

    #[tokio::test]
    async fn status_only_update_leaves_answer_untouched() {
        let db = setup_test_db().await;

        let q = Model::create(&db, "Printer jams on page 2", None).await.unwrap();
        let updated = q
            .apply_update(&db, Some(QuestionStatus::Escalated), None, "alice")
            .await
            .unwrap();

        assert_eq!(updated.status, QuestionStatus::Escalated);
        assert!(updated.answer.is_none());
        assert!(updated.answered_by.is_none());
    }

    #[tokio::test]
    async fn dashboard_order_puts_escalated_before_newer_pending() {
        let db = setup_test_db().await;

        let older = Model::create(&db, "older question", None).await.unwrap();
        let older = older
            .apply_update(&db, Some(QuestionStatus::Escalated), None, "alice")
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = Model::create(&db, "newer question", None).await.unwrap();

        let listed = Model::list_for_dashboard(&db).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, older.id);
        assert_eq!(listed[1].id, newer.id);
    }

    #[tokio::test]
    async fn dashboard_order_is_newest_first_within_a_status() {
        let db = setup_test_db().await;

        let first = Model::create(&db, "first", None).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = Model::create(&db, "second", None).await.unwrap();

        let listed = Model::list_for_dashboard(&db).await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn status_parsing_is_a_closed_set() {
        assert_eq!(
            QuestionStatus::from_str("Answered").unwrap(),
            QuestionStatus::Answered
        );
        // Tolerant of casing, strict about membership.
        assert_eq!(
            QuestionStatus::from_str("escalated").unwrap(),
            QuestionStatus::Escalated
        );
        assert!(QuestionStatus::from_str("Sideways").is_err());
        assert!(QuestionStatus::from_str("").is_err());
    }
}
