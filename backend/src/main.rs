//! Main entry point for the user-account service backend.
//!
//! This file initializes the Axum web server, sets up the database
//! connection, runs the idempotent schema bootstrap, and registers all API
//! routes and middleware. The bootstrap completes before the listener binds,
//! so no request is served against missing storage.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::ApiResponse;
use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use database::Database;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    let pool = db.pool().clone();

    // Storage must exist before any request-handling path runs.
    database::bootstrap::ensure_users_table(&pool).await?;

    let app = Router::new()
        .route("/", get(root_handler))
        .nest(
            "/users",
            auth::routes::auth_router().merge(api::user::routes::user_router()),
        )
        .layer(Extension(pool))
        .layer(Extension(config.clone()));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Starting user service on port {}", config.server_port);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "User Service Backend",
            "version": "0.1.0"
        }),
        "Welcome to the User Service API",
    ))
}
