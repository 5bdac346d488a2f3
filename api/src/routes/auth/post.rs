use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::user::Model as UserModel;
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub token: String,
    pub expires_at: String,
}

impl UserResponse {
    fn from_user(user: UserModel) -> Self {
        let (token, expires_at) = generate_jwt(user.id, user.admin);
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            admin: user.admin,
            token,
            expires_at,
        }
    }
}

/// POST /auth/register
///
/// Register a new user and issue a JWT.
///
/// ### Responses
/// - `201 Created` with the user and a token
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` when the username or email is already taken
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<UserResponse>::error(error_message)),
        );
    }

    let db = app_state.db();

    match UserModel::get_by_username(db, &req.username).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error(
                    "A user with this username already exists",
                )),
            );
        }
        Ok(None) => {}
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {}", e))),
            );
        }
    }

    match UserModel::get_by_email(db, &req.email).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error("A user with this email already exists")),
            );
        }
        Ok(None) => {}
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {}", e))),
            );
        }
    }

    // Every account may triage questions, matching the dashboard's model.
    match UserModel::create(db, &req.username, &req.email, &req.password, true).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                UserResponse::from_user(user),
                "User registered successfully",
            )),
        ),
        Err(e) => {
            // Backstop for races past the pre-checks: map unique-constraint
            // violations to the same conflict responses.
            let msg = e.to_string();
            if msg.contains("users.email") {
                return (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::error("A user with this email already exists")),
                );
            }
            if msg.contains("users.username") {
                return (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::error(
                        "A user with this username already exists",
                    )),
                );
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {}", e))),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/login
///
/// Authenticate an existing user and issue a JWT.
///
/// ### Responses
/// - `200 OK` with the user and a token
/// - `401 Unauthorized` on unknown username or wrong password, with a
///   message that does not distinguish the two
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    match UserModel::verify_credentials(db, &req.username, &req.password).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                UserResponse::from_user(user),
                "Login successful",
            )),
        ),
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<UserResponse>::error(
                "Invalid username or password",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {}", e))),
        ),
    }
}
