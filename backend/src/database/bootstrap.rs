//! Idempotent schema bootstrap run once at process startup.
//!
//! Ensures the `users` table exists before the HTTP listener starts accepting
//! connections. Re-running on every startup is safe: an existing table is a
//! no-op, only a storage failure is fatal.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

const USERS_TABLE: &str = "users";

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE users (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    no_of_logins INTEGER NOT NULL DEFAULT 0,
    last_login_at TEXT,
    games_played INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// Creates the `users` table if it does not exist yet.
pub async fn ensure_users_table(pool: &SqlitePool) -> Result<()> {
    if table_exists(pool, USERS_TABLE).await? {
        info!("bootstrap: {} table already exists", USERS_TABLE);
        return Ok(());
    }

    info!("bootstrap: creating {} table", USERS_TABLE);
    sqlx::query(CREATE_USERS_TABLE).execute(pool).await?;

    Ok(())
}

/// Checks the SQLite catalog for a table with the given name.
async fn table_exists(pool: &SqlitePool, name: &str) -> Result<bool> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;

    Ok(row.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        // A single connection keeps every statement on the same in-memory db.
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn creates_users_table_when_absent() {
        let pool = memory_pool().await;

        assert!(!table_exists(&pool, USERS_TABLE).await.unwrap());
        ensure_users_table(&pool).await.unwrap();
        assert!(table_exists(&pool, USERS_TABLE).await.unwrap());
    }

    #[tokio::test]
    async fn is_idempotent_across_repeated_runs() {
        let pool = memory_pool().await;

        ensure_users_table(&pool).await.unwrap();
        ensure_users_table(&pool).await.unwrap();

        assert!(table_exists(&pool, USERS_TABLE).await.unwrap());

        // The table is still usable after the second run.
        sqlx::query("INSERT INTO users (id, name, email, password_hash, created_at, updated_at) VALUES ('1', 'Ana', 'ana@x.com', 'hash', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')")
            .execute(&pool)
            .await
            .unwrap();
    }
}
