//! Middleware for protecting authenticated routes.
//!
//! Validates bearer tokens on inbound requests and attaches the resolved
//! claims to the request before handing control downstream. The guard is
//! memoryless: nothing is cached between requests and a token stays valid
//! until its encoded expiry.

use crate::config::Config;
use crate::utils::jwt::JwtUtils;
use axum::{
    extract::Request,
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// JWT authentication middleware.
///
/// Missing header, malformed header, bad signature, and expired token all
/// produce the same 401; the cause is never exposed to the client.
pub async fn jwt_auth(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Check if it's a Bearer token
    if !auth_header.starts_with("Bearer ") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = &auth_header[7..]; // Remove "Bearer " prefix

    // The Config extension is installed by the outermost router layer.
    let config = request
        .extensions()
        .get::<Config>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    let jwt_utils = JwtUtils::from_config(&config);

    match jwt_utils.validate_token(token) {
        Ok(claims) => {
            tracing::debug!("token verified for user {}", claims.user_id());
            // Add claims to request extensions for use in handlers
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::PublicUser;
    use axum::{
        Extension, Router,
        body::Body,
        http::Request as HttpRequest,
        middleware,
        routing::get,
    };
    use chrono::Utc;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in_seconds: 3600,
            server_port: 0,
        }
    }

    fn guarded_app() -> Router {
        Router::new()
            .route(
                "/guarded",
                get(|Extension(claims): Extension<crate::utils::jwt::Claims>| async move {
                    claims.sub
                })
                .layer(middleware::from_fn(jwt_auth)),
            )
            .layer(Extension(test_config()))
    }

    fn bearer_for(secret: &str) -> String {
        let user = PublicUser {
            id: "user-1".to_string(),
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            no_of_logins: 0,
            last_login_at: None,
            games_played: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let token = JwtUtils::new(secret, 3600).generate_token(&user).unwrap();
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn passes_valid_bearer_token_through() {
        let response = guarded_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/guarded")
                    .header(AUTHORIZATION, bearer_for("test-secret"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let response = guarded_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/guarded")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_non_bearer_scheme() {
        let response = guarded_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/guarded")
                    .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_token_signed_with_another_secret() {
        let response = guarded_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/guarded")
                    .header(AUTHORIZATION, bearer_for("other-secret"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
