//! Defines the HTTP routes for user profile and management.
//!
//! Every route here sits behind the JWT middleware; signup and signin live in
//! the auth router.

use super::handlers::{
    get_all_users, get_profile, get_user_by_id, remove_user, update_profile, update_user,
};
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, patch},
};

pub fn user_router() -> Router {
    Router::new()
        .route(
            "/profile",
            get(get_profile).layer(middleware::from_fn(jwt_auth)),
        )
        .route(
            "/update-profile",
            patch(update_profile).layer(middleware::from_fn(jwt_auth)),
        )
        .route(
            "/",
            get(get_all_users).layer(middleware::from_fn(jwt_auth)),
        )
        .route(
            "/{id}",
            get(get_user_by_id)
                .put(update_user)
                .delete(remove_user)
                .layer(middleware::from_fn(jwt_auth)),
        )
}
