//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for signup and signin,
//! parse request data, and interact with the `auth::service` for the core
//! business logic.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::models::{AuthResponse, SigninRequest, SignupRequest};
use crate::auth::service::AuthService;
use crate::config::Config;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle user signup request
#[axum::debug_handler]
pub async fn sign_up(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<SignupRequest>,
) -> Result<ResponseJson<ApiResponse<AuthResponse>>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &config);

    match auth_service.signup(payload).await {
        Ok(response) => Ok(ResponseJson(ApiResponse::success(
            response,
            "Successfully signed up!",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user signin request
#[axum::debug_handler]
pub async fn sign_in(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<SigninRequest>,
) -> Result<ResponseJson<ApiResponse<AuthResponse>>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &config);

    match auth_service.signin(payload).await {
        Ok(response) => Ok(ResponseJson(ApiResponse::success(
            response,
            "Signin successful!",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
