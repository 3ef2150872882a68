//! Database repository for user account operations.
//!
//! Provides CRUD operations plus the signin/game-stat bookkeeping updates.

use crate::database::models::{CreateUser, User, UserPatch};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, no_of_logins, last_login_at, \
                            games_played, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new user and returns the stored row.
    ///
    /// The UNIQUE constraint on `email` is the storage-level backstop for
    /// duplicate accounts; the service layer checks first to produce a
    /// friendlier error.
    pub async fn create_user(&self, user: CreateUser) -> Result<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, no_of_logins, games_played, created_at, updated_at) \
             VALUES (?, ?, ?, ?, 0, 0, ?, ?) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Retrieves a user by their (normalized) email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, oldest first.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Applies a partial update; `None` fields are left untouched.
    ///
    /// Returns `None` when no row matches `id`.
    pub async fn update_user(&self, id: &str, patch: UserPatch) -> Result<Option<User>> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                 name = COALESCE(?, name), \
                 email = COALESCE(?, email), \
                 password_hash = COALESCE(?, password_hash), \
                 updated_at = ? \
             WHERE id = ? \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.password_hash)
        .bind(now)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Signin bookkeeping: bumps the login counter and stamps the login time.
    pub async fn record_login(&self, id: &str) -> Result<Option<User>> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                 no_of_logins = no_of_logins + 1, \
                 last_login_at = ?, \
                 updated_at = ? \
             WHERE id = ? \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(now)
        .bind(now)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Bumps the games-played counter.
    pub async fn increment_games_played(&self, id: &str) -> Result<Option<User>> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                 games_played = games_played + 1, \
                 updated_at = ? \
             WHERE id = ? \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(now)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Removes a user, returning the deleted row if it existed.
    pub async fn delete_user(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = ? RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}
