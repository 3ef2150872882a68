//! User business logic service.
//!
//! Handles all account-related business operations: signup-time validation
//! and creation, profile reads, game-stat bookkeeping, and admin CRUD.

use crate::api::common::validation_errors_to_message;
use crate::auth::models::SignupRequest;
use crate::database::models::{CreateUser, PublicUser, UpdateUserRequest, User, UserPatch};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::utils::password;
use sqlx::SqlitePool;
use validator::Validate;

/// Normalizes an email for storage and lookup: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user with full validation.
    ///
    /// Normalizes the email, rejects duplicates, and hashes the password
    /// before anything touches storage. The returned projection never carries
    /// the hash.
    ///
    /// # Errors
    /// Returns `ServiceError` for validation failures, weak passwords, and
    /// already-registered emails.
    pub async fn create_user(&self, mut request: SignupRequest) -> ServiceResult<PublicUser> {
        // Normalize first, then validate the normalized values: an email like
        // "Ana@X.com " must be trimmed and lowercased, not rejected.
        request.name = request.name.trim().to_string();
        request.email = normalize_email(&request.email);

        // Input validation using validator crate
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(validation_errors_to_message(
                validation_errors,
            )));
        }

        Self::validate_password_rules(&request.password)?;

        let SignupRequest {
            name,
            email,
            password,
        } = request;

        let repo = UserRepository::new(self.pool);

        // Check if a user with this email already exists
        if repo.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::already_exists("User", &email));
        }

        let password_hash = password::hash_password(&password)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))?;

        let user = repo
            .create_user(CreateUser {
                name,
                email,
                password_hash,
            })
            .await?;

        Ok(user.into())
    }

    /// Retrieves a user by ID with existence verification.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if the user doesn't exist.
    pub async fn get_user_required(&self, id: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(user)
    }

    /// Lists all users in sanitized form.
    pub async fn list_users(&self) -> ServiceResult<Vec<PublicUser>> {
        let repo = UserRepository::new(self.pool);
        let users = repo.list_users().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// Admin-style partial update of name, email, and/or password.
    ///
    /// A supplied password is re-hashed and a supplied email re-normalized
    /// and checked against other accounts before persisting.
    pub async fn update_user(
        &self,
        id: &str,
        mut request: UpdateUserRequest,
    ) -> ServiceResult<PublicUser> {
        // Same ordering as signup: normalize, then validate what will be
        // stored.
        request.name = request.name.map(|n| n.trim().to_string());
        request.email = request.email.map(|e| normalize_email(&e));

        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(validation_errors_to_message(
                validation_errors,
            )));
        }

        let repo = UserRepository::new(self.pool);

        if let Some(email) = request.email.as_deref() {
            if let Some(existing) = repo.find_by_email(email).await? {
                if existing.id != id {
                    return Err(ServiceError::already_exists("User", email));
                }
            }
        }

        let password_hash = match request.password.as_deref() {
            Some(plain) => {
                Self::validate_password_rules(plain)?;
                Some(password::hash_password(plain).map_err(|e| {
                    ServiceError::internal_error(format!("Password hashing failed: {}", e))
                })?)
            }
            None => None,
        };

        let patch = UserPatch {
            name: request.name,
            email: request.email,
            password_hash,
        };

        let user = repo
            .update_user(id, patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;

        Ok(user.into())
    }

    /// Bumps the games-played counter for the given user.
    pub async fn increment_games_played(&self, id: &str) -> ServiceResult<PublicUser> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .increment_games_played(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(user.into())
    }

    /// Removes a user by ID.
    pub async fn remove_user(&self, id: &str) -> ServiceResult<PublicUser> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .delete_user(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(user.into())
    }

    /// Password strength rules: at least one letter, one digit, and one of
    /// the accepted special characters. Length is enforced by the DTO.
    fn validate_password_rules(password: &str) -> ServiceResult<()> {
        if !password.chars().any(|c| c.is_ascii_alphabetic()) {
            return Err(ServiceError::validation(
                "Password must contain at least 1 letter",
            ));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ServiceError::validation(
                "Password must contain at least 1 number",
            ));
        }
        if !password.chars().any(|c| "@$!%*?&".contains(c)) {
            return Err(ServiceError::validation(
                "Password must contain at least 1 special character",
            ));
        }
        Ok(())
    }
}
