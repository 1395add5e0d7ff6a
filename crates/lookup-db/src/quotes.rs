//! Best-effort quote log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lookup_core::quote::QuoteSink;
use lookup_core::{Deadline, SinkError};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::DbResult;

/// A stored quote.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuoteRecord {
    pub id: i64,
    pub bid: String,
    pub fetched_at: DateTime<Utc>,
}

/// Quote log on a shared SQLite pool. The pool serialises access, so one
/// sink serves every in-flight request.
#[derive(Clone)]
pub struct SqliteQuoteSink {
    pool: SqlitePool,
}

impl SqliteQuoteSink {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn insert(&self, bid: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO quotes (bid, fetched_at) VALUES (?, ?)")
            .bind(bid)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Most recent quotes first.
    pub async fn recent(&self, limit: i64) -> DbResult<Vec<QuoteRecord>> {
        let records = sqlx::query_as::<_, QuoteRecord>(
            "SELECT id, bid, fetched_at FROM quotes ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

#[async_trait]
impl QuoteSink for SqliteQuoteSink {
    async fn record(&self, bid: &str, deadline: &Deadline) -> Result<(), SinkError> {
        deadline
            .run(self.insert(bid))
            .await?
            .map_err(|e| {
                debug!(error = %e, "quote insert rejected by database");
                SinkError::Storage(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_migrations;
    use lookup_core::DeadlineError;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::time::Duration;

    // One connection: every connection to `:memory:` is a separate database.
    async fn memory_sink() -> SqliteQuoteSink {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteQuoteSink::new(pool)
    }

    #[tokio::test]
    async fn test_record_and_read_back() {
        let sink = memory_sink().await;
        let deadline = Deadline::after(Duration::from_secs(5));

        sink.record("5.43", &deadline).await.unwrap();
        sink.record("5.44", &deadline).await.unwrap();

        let recent = sink.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].bid, "5.44");
        assert_eq!(recent[1].bid, "5.43");
    }

    #[tokio::test]
    async fn test_cancelled_deadline_writes_nothing() {
        let sink = memory_sink().await;
        let deadline = Deadline::after(Duration::from_secs(5));
        deadline.cancel();

        let err = sink.record("5.43", &deadline).await.unwrap_err();
        assert!(matches!(err, SinkError::Deadline(DeadlineError::Cancelled)));
        assert!(sink.recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_table_is_storage_error() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let sink = SqliteQuoteSink::new(pool);
        let deadline = Deadline::after(Duration::from_secs(5));

        let err = sink.record("5.43", &deadline).await.unwrap_err();
        assert!(matches!(err, SinkError::Storage(_)));
    }
}
