//! Exchange quote types and capabilities.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ClientResult, Deadline, SinkError};

/// The response body of the quote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: String,
}

/// Fetches the latest USD-BRL bid.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn latest_bid(&self, deadline: &Deadline) -> ClientResult<String>;
}

/// Append-only quote log. Must be safe to share across in-flight requests.
#[async_trait]
pub trait QuoteSink: Send + Sync {
    async fn record(&self, bid: &str, deadline: &Deadline) -> Result<(), SinkError>;
}
