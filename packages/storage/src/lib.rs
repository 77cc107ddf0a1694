// ABOUTME: Data layer and persistence for Curbside
// ABOUTME: Provides the shared SQLite pool, error types, and embedded migrations

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Embedded schema migrations, applied at pool init.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Invalid configuration format")]
    InvalidFormat,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Connect to the SQLite database at `path`, creating it (and its parent
/// directory) when missing, and run migrations.
pub async fn connect(path: &Path) -> StorageResult<SqlitePool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
    }

    let database_url = format!("sqlite:{}?mode=rwc", path.display());
    debug!("Connecting to database: {}", database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&database_url)
        .await
        .map_err(StorageError::Sqlx)?;

    configure_pool(&pool, true).await?;

    MIGRATOR.run(&pool).await.map_err(StorageError::Migration)?;
    debug!("Database migrations completed");

    info!("Database connection established");
    Ok(pool)
}

/// Connect to an in-memory database with migrations applied. Test helper.
pub async fn connect_in_memory() -> StorageResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .map_err(StorageError::Sqlx)?;

    configure_pool(&pool, false).await?;
    MIGRATOR.run(&pool).await.map_err(StorageError::Migration)?;
    Ok(pool)
}

async fn configure_pool(pool: &SqlitePool, enable_wal: bool) -> StorageResult<()> {
    if enable_wal {
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(pool)
            .await
            .map_err(StorageError::Sqlx)?;
    }

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await
        .map_err(StorageError::Sqlx)?;

    Ok(())
}
