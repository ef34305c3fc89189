use std::sync::Arc;

use serenity::prelude::TypeMapKey;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::error::BotError;

pub mod admin;
pub mod suggestions;

pub use admin::QueryOutcome;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn open(path: &str) -> Result<Database, BotError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    /// Creates the suggestion table and brings an older database up to the
    /// current schema. Early deployments only had `id` and `title`; the
    /// missing columns are added in place with their defaults so existing
    /// rows survive.
    async fn init(&self) -> Result<(), BotError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS movie_suggestions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL COLLATE NOCASE UNIQUE,
                suggestion_count INTEGER NOT NULL DEFAULT 1,
                won INTEGER NOT NULL DEFAULT 0,
                date_won TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        let columns: Vec<String> = sqlx::query("PRAGMA table_info(movie_suggestions)")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| row.get("name"))
            .collect();

        for (name, definition) in [
            ("suggestion_count", "suggestion_count INTEGER NOT NULL DEFAULT 1"),
            ("won", "won INTEGER NOT NULL DEFAULT 0"),
            ("date_won", "date_won TEXT"),
        ] {
            if !columns.iter().any(|c| c == name) {
                info!("migrating movie_suggestions: adding column {}", name);
                sqlx::query(&format!(
                    "ALTER TABLE movie_suggestions ADD COLUMN {}",
                    definition
                ))
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub async fn in_memory() -> Database {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let db = Self { pool };
        db.init().await.unwrap();
        db
    }
}

impl TypeMapKey for Database {
    type Value = Arc<Database>;
}
