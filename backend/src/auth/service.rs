//! Core business logic for the authentication system.

use crate::api::common::validation_errors_to_message;
use crate::auth::models::{AuthResponse, SigninRequest, SignupRequest};
use crate::config::Config;
use crate::database::models::PublicUser;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::services::user_service::{UserService, normalize_email};
use crate::utils::jwt::JwtUtils;
use crate::utils::password;
use sqlx::SqlitePool;
use tracing::warn;
use validator::Validate;

/// Authentication service for handling signup, signin, and token issuance.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: JwtUtils,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance.
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        AuthService {
            pool,
            jwt_utils: JwtUtils::from_config(config),
        }
    }

    /// Register a new account and sign it in immediately.
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<AuthResponse> {
        let user_service = UserService::new(self.pool);
        let user = user_service.create_user(request).await?;

        let access_token = self.jwt_utils.generate_token(&user)?;
        Ok(AuthResponse { access_token, user })
    }

    /// Authenticate credentials and issue an access token.
    ///
    /// Every credential failure surfaces as the same opaque unauthorized
    /// error. On success the login counter and timestamp are updated before
    /// the token is issued.
    pub async fn signin(&self, mut request: SigninRequest) -> ServiceResult<AuthResponse> {
        // Normalize before validating so an untrimmed or mixed-case email
        // still signs in.
        request.email = normalize_email(&request.email);

        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(validation_errors_to_message(
                validation_errors,
            )));
        }

        let user = self
            .validate_user(&request.email, &request.password)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("Invalid credentials"))?;

        // Login bookkeeping is deliberately separate from validation so the
        // credential check itself stays side-effect-free.
        let repo = UserRepository::new(self.pool);
        let user: PublicUser = repo
            .record_login(&user.id)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("Invalid credentials"))?
            .into();

        let access_token = self.jwt_utils.generate_token(&user)?;
        Ok(AuthResponse { access_token, user })
    }

    /// Checks credentials against storage without mutating anything.
    ///
    /// Expects an already-normalized email. Unknown email, wrong password,
    /// and an unreadable stored hash all come back as `None`; the caller
    /// cannot tell them apart, and neither can the client.
    pub async fn validate_user(
        &self,
        email: &str,
        password: &str,
    ) -> ServiceResult<Option<PublicUser>> {
        let repo = UserRepository::new(self.pool);

        let Some(user) = repo.find_by_email(email).await? else {
            warn!("no account found for email {}", email);
            return Ok(None);
        };

        match password::verify_password(password, &user.password_hash) {
            Ok(true) => Ok(Some(user.into())),
            Ok(false) => {
                warn!("invalid password for email {}", email);
                Ok(None)
            }
            Err(e) => {
                warn!("unverifiable password hash for email {}: {}", email, e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::bootstrap::ensure_users_table;
    use crate::database::models::CreateUser;
    use sqlx::sqlite::SqlitePoolOptions;

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

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ensure_users_table(&pool).await.unwrap();
        pool
    }

    async fn seed_ana(pool: &SqlitePool) -> PublicUser {
        let config = test_config();
        let auth = AuthService::new(pool, &config);
        auth.signup(SignupRequest {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password: "Password1!".to_string(),
        })
        .await
        .unwrap()
        .user
    }

    #[tokio::test]
    async fn validate_user_unknown_email_is_none() {
        let pool = test_pool().await;
        let config = test_config();
        let auth = AuthService::new(&pool, &config);

        let result = auth
            .validate_user("nobody@x.com", "Password1!")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn validate_user_wrong_password_is_none() {
        let pool = test_pool().await;
        seed_ana(&pool).await;
        let config = test_config();
        let auth = AuthService::new(&pool, &config);

        let result = auth
            .validate_user("ana@x.com", "WrongPassword1!")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn validate_user_malformed_stored_hash_is_none() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);
        repo.create_user(CreateUser {
            name: "Broken".to_string(),
            email: "broken@x.com".to_string(),
            password_hash: "not-a-bcrypt-hash".to_string(),
        })
        .await
        .unwrap();

        let config = test_config();
        let auth = AuthService::new(&pool, &config);

        let result = auth
            .validate_user("broken@x.com", "Password1!")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn validate_user_does_not_mutate_login_state() {
        let pool = test_pool().await;
        seed_ana(&pool).await;
        let config = test_config();
        let auth = AuthService::new(&pool, &config);

        auth.validate_user("ana@x.com", "Password1!")
            .await
            .unwrap()
            .unwrap();

        let repo = UserRepository::new(&pool);
        let stored = repo.find_by_email("ana@x.com").await.unwrap().unwrap();
        assert_eq!(stored.no_of_logins, 0);
        assert!(stored.last_login_at.is_none());
    }

    #[tokio::test]
    async fn signin_increments_login_counter_and_issues_valid_token() {
        let pool = test_pool().await;
        seed_ana(&pool).await;
        let config = test_config();
        let auth = AuthService::new(&pool, &config);

        let response = auth
            .signin(SigninRequest {
                email: " Ana@X.com".to_string(),
                password: "Password1!".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.user.no_of_logins, 1);
        assert!(response.user.last_login_at.is_some());

        let claims = JwtUtils::from_config(&config)
            .validate_token(&response.access_token)
            .unwrap();
        assert_eq!(claims.user_id(), response.user.id);
        assert_eq!(claims.email, "ana@x.com");
    }

    #[tokio::test]
    async fn signin_accepts_untrimmed_mixed_case_email() {
        let pool = test_pool().await;
        seed_ana(&pool).await;
        let config = test_config();
        let auth = AuthService::new(&pool, &config);

        // Normalization runs before DTO validation, so this must not be
        // rejected as a malformed email.
        let response = auth
            .signin(SigninRequest {
                email: "  ANA@X.COM  ".to_string(),
                password: "Password1!".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.user.email, "ana@x.com");
        assert_eq!(response.user.no_of_logins, 1);
    }

    #[tokio::test]
    async fn signin_failure_is_uniform_and_leaves_counter_unchanged() {
        let pool = test_pool().await;
        seed_ana(&pool).await;
        let config = test_config();
        let auth = AuthService::new(&pool, &config);

        let wrong_password = auth
            .signin(SigninRequest {
                email: "ana@x.com".to_string(),
                password: "WrongPassword1!".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_user = auth
            .signin(SigninRequest {
                email: "nobody@x.com".to_string(),
                password: "Password1!".to_string(),
            })
            .await
            .unwrap_err();

        // Same externally visible outcome for both causes.
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, ServiceError::Unauthorized { .. }));

        let repo = UserRepository::new(&pool);
        let stored = repo.find_by_email("ana@x.com").await.unwrap().unwrap();
        assert_eq!(stored.no_of_logins, 0);
    }

    #[tokio::test]
    async fn signup_returns_a_token_for_the_new_account() {
        let pool = test_pool().await;
        let config = test_config();
        let auth = AuthService::new(&pool, &config);

        let response = auth
            .signup(SignupRequest {
                name: "Ana".to_string(),
                email: "Ana@X.com ".to_string(),
                password: "Password1!".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.user.email, "ana@x.com");
        let claims = JwtUtils::from_config(&config)
            .validate_token(&response.access_token)
            .unwrap();
        assert_eq!(claims.user_id(), response.user.id);
    }
}
