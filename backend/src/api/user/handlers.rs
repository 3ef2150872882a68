//! Handler functions for user profile and management API endpoints.
//!
//! These functions process requests for user data, interact with the user
//! service, and return user-specific information. The profile endpoints act
//! on the identity resolved by the auth middleware; the id-based CRUD
//! endpoints are admin-style and report misses as explicit 404s.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::{PublicUser, UpdateUserRequest};
use crate::services::user_service::UserService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Returns the profile of the authenticated user.
#[axum::debug_handler]
pub async fn get_profile(
    Extension(claims): Extension<Claims>,
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<ApiResponse<PublicUser>>, (StatusCode, String)> {
    let user_service = UserService::new(&pool);

    match user_service.get_user_required(claims.user_id()).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(user.into(), "Success"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Bumps the games-played counter for the authenticated user.
#[axum::debug_handler]
pub async fn update_profile(
    Extension(claims): Extension<Claims>,
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<ApiResponse<PublicUser>>, (StatusCode, String)> {
    tracing::info!("incrementing games played for user {}", claims.user_id());

    let user_service = UserService::new(&pool);

    match user_service.increment_games_played(claims.user_id()).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(user, "Success"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists all users.
#[axum::debug_handler]
pub async fn get_all_users(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<ApiResponse<Vec<PublicUser>>>, (StatusCode, String)> {
    let user_service = UserService::new(&pool);

    match user_service.list_users().await {
        Ok(users) => Ok(ResponseJson(ApiResponse::success(
            users,
            "Users retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves a user by its ID.
#[axum::debug_handler]
pub async fn get_user_by_id(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<PublicUser>>, (StatusCode, String)> {
    let user_service = UserService::new(&pool);

    match user_service.get_user_required(&id).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            user.into(),
            "User retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Updates a user's name, email, and/or password.
#[axum::debug_handler]
pub async fn update_user(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<ResponseJson<ApiResponse<PublicUser>>, (StatusCode, String)> {
    let user_service = UserService::new(&pool);

    match user_service.update_user(&id, payload).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            user,
            "User updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Removes a user by its ID.
#[axum::debug_handler]
pub async fn remove_user(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<PublicUser>>, (StatusCode, String)> {
    let user_service = UserService::new(&pool);

    match user_service.remove_user(&id).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            user,
            "User removed successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
