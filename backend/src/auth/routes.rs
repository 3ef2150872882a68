//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle signup and signin and are designed to be nested under
//! `/users` in the main Axum router.

use crate::auth::handlers::*;
use axum::{Router, routing::post};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
}
