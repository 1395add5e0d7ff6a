//! Database layer for the quote service.
//!
//! Provides the SQLite pool and the best-effort quote log.

pub mod error;
pub mod quotes;

pub use error::{DbError, DbResult};
pub use quotes::{QuoteRecord, SqliteQuoteSink};

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;

/// Open (creating if needed) the SQLite database at `path`.
pub async fn create_pool(path: &Path) -> DbResult<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Run database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Cheap liveness query for readiness probes.
pub async fn ping(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
