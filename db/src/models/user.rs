use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::ActiveValue::Set;
use sea_orm::QueryFilter;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique username.
    pub username: String,
    /// User's unique email address.
    pub email: String,
    /// Securely hashed password string. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the user may triage questions from the dashboard.
    pub admin: bool,
    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::question::Entity")]
    Question,
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts a new user with an argon2-hashed password.
    ///
    /// Unique-constraint violations on `username` or `email` surface as the
    /// underlying database error.
    pub async fn create(
        db: &DbConn,
        username: &str,
        email: &str,
        password: &str,
        admin: bool,
    ) -> Result<Model, DbErr> {
        let password_hash = hash_password(password)?;
        let now = Utc::now();

        let active_model = ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set(password_hash),
            admin: Set(admin),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn get_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn get_by_username(db: &DbConn, username: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Username.eq(username))
            .one(db)
            .await
    }

    pub async fn get_by_email(db: &DbConn, email: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email))
            .one(db)
            .await
    }

    /// Looks up `username` and checks `password` against the stored hash.
    ///
    /// Returns `Ok(None)` for an unknown username or a wrong password, so the
    /// caller cannot distinguish the two cases.
    pub async fn verify_credentials(
        db: &DbConn,
        username: &str,
        password: &str,
    ) -> Result<Option<Model>, DbErr> {
        let Some(user) = Self::get_by_username(db, username).await? else {
            return Ok(None);
        };

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| DbErr::Custom(format!("Corrupt password hash: {e}")))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

fn hash_password(password: &str) -> Result<String, DbErr> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn create_and_verify_credentials() {
        let db = setup_test_db().await;

        let user = Model::create(&db, "alice", "alice@example.com", "hunter22", true)
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "hunter22");

        let verified = Model::verify_credentials(&db, "alice", "hunter22")
            .await
            .unwrap();
        assert_eq!(verified.map(|u| u.id), Some(user.id));

        let wrong = Model::verify_credentials(&db, "alice", "wrong").await.unwrap();
        assert!(wrong.is_none());

        let unknown = Model::verify_credentials(&db, "bob", "hunter22").await.unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_by_unique_constraint() {
        let db = setup_test_db().await;

        Model::create(&db, "alice", "shared@example.com", "pw", true)
            .await
            .unwrap();
        let dup = Model::create(&db, "bob", "shared@example.com", "pw", true).await;
        assert!(dup.is_err());

        let count = Entity::find().all(&db).await.unwrap().len();
        assert_eq!(count, 1);
    }
}
