//! Snapshot storage for the named store slots.
//!
//! SQLite is the source of truth. Every store serializes its entire state
//! into one row of the `slots` table on mutation and restores it verbatim
//! on startup. Slot names are carried over from the browser client's
//! persisted storage keys.

use serde::{de::DeserializeOwned, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

use crate::errors::AppError;

/// Persisted slot names.
pub mod slots {
    pub const AUTH: &str = "auth-storage";
    pub const POSTS: &str = "posts";
    pub const COMMENTS: &str = "comment-storage";
    pub const FAVORITES: &str = "favorites-store";
    pub const NOTIFICATIONS: &str = "notification-storage";
    pub const REPORTS: &str = "report-storage";
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            name TEXT PRIMARY KEY,
            state TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Handle the stores persist their snapshots through.
#[derive(Clone)]
pub struct SlotStore {
    pool: SqlitePool,
}

impl SlotStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read a slot's snapshot. None when the slot was never written.
    pub async fn read_slot<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, AppError> {
        let row = sqlx::query("SELECT state FROM slots WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let state: String = row.get("state");
                Ok(Some(serde_json::from_str(&state)?))
            }
            None => Ok(None),
        }
    }

    /// Read a slot's snapshot, starting fresh when it is missing or no
    /// longer decodes against the current state shape.
    pub async fn read_slot_or_default<T>(&self, name: &str) -> Result<T, AppError>
    where
        T: DeserializeOwned + Default,
    {
        match self.read_slot(name).await {
            Ok(Some(state)) => Ok(state),
            Ok(None) => Ok(T::default()),
            Err(AppError::Storage(msg)) if msg.starts_with("Snapshot encoding") => {
                tracing::warn!("Discarding unreadable snapshot for slot {}: {}", name, msg);
                Ok(T::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Overwrite a slot with the given state.
    pub async fn write_slot<T: Serialize>(&self, name: &str, state: &T) -> Result<(), AppError> {
        let state = serde_json::to_string(state)?;
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO slots (name, state, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at
            "#,
        )
        .bind(name)
        .bind(&state)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
