//! Durable key-value state on SQLite.
//!
//! A single `app_state` table holds the handful of values that must survive
//! process restarts (today: the selected movie). Writes are UPSERTs; reads of
//! missing keys are `None`, never errors.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to open state database: {0}")]
    Open(#[source] sqlx::Error),
    #[error("State database error: {0}")]
    Query(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct StateDb {
    pool: SqlitePool,
}

impl StateDb {
    /// Open (creating if necessary) the state database and run migrations.
    /// Pass `":memory:"` for an ephemeral store in tests.
    pub async fn open(path: &str) -> Result<Self, StateError> {
        let url = format!("sqlite:{}?mode=rwc", path);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .map_err(StateError::Open)?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), StateError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a value by key, or `None` if the key has never been set.
    pub async fn get_value(&self, key: &str) -> Result<Option<String>, StateError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM app_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    /// Set a value (UPSERT), refreshing the timestamp.
    pub async fn set_value(&self, key: &str, value: &str) -> Result<(), StateError> {
        sqlx::query(
            r#"
            INSERT INTO app_state (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Remove a key. Removing a missing key is not an error.
    pub async fn remove_value(&self, key: &str) -> Result<(), StateError> {
        sqlx::query("DELETE FROM app_state WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
