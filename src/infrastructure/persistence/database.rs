use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

/// Audit-log database wrapper
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self> {
        // Ensure the directory exists if it's a file path
        if let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal); // Better for concurrency

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Connected to database: {}", db_url);

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// In-memory database for tests. A single connection keeps every query on
    /// the same memory instance.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                age REAL NOT NULL,
                sex REAL NOT NULL,
                cp REAL NOT NULL,
                trestbps REAL NOT NULL,
                chol REAL NOT NULL,
                fbs REAL NOT NULL,
                restecg REAL NOT NULL,
                thalach REAL NOT NULL,
                exang REAL NOT NULL,
                oldpeak REAL NOT NULL,
                slope REAL NOT NULL,
                ca REAL NOT NULL,
                thal REAL NOT NULL,
                prediction_lr INTEGER NOT NULL,
                prediction_knn INTEGER NOT NULL,
                prediction_svm INTEGER NOT NULL,
                prediction_rf INTEGER NOT NULL,
                prediction_time TEXT NOT NULL
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create predictions table")?;

        // Index for the history sort key
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_predictions_time
            ON predictions (prediction_time);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create predictions index")?;

        info!("Database schema initialized.");
        Ok(())
    }
}
