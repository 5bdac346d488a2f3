use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::user::Model as UserModel;
use serde::Serialize;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;

#[derive(Debug, Serialize, Default)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
}

/// GET /auth/me
///
/// Returns the identity of the token's bearer.
///
/// ### Responses
/// - `200 OK` with id, username, email, and admin flag
/// - `401 Unauthorized` on a missing/invalid token or a deleted account
pub async fn me(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> impl IntoResponse {
    match UserModel::get_by_id(app_state.db(), claims.sub).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                MeResponse {
                    id: user.id,
                    username: user.username,
                    email: user.email,
                    admin: user.admin,
                },
                "User fetched successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<MeResponse>::error("User no longer exists")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {}", e))),
        ),
    }
}
