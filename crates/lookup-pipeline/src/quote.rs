//! Quote lookup: one fetch, then a best-effort write to the quote log.

use lookup_core::quote::{Quote, QuoteSink, QuoteSource};
use lookup_core::{Deadline, DeadlineError, QuoteError, SinkError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct QuoteBudgets {
    pub fetch: Duration,
    /// Must stay shorter than the request deadline.
    pub persist: Duration,
}

impl Default for QuoteBudgets {
    fn default() -> Self {
        Self {
            fetch: Duration::from_millis(200),
            persist: Duration::from_millis(10),
        }
    }
}

pub struct QuotePipeline {
    source: Arc<dyn QuoteSource>,
    sink: Arc<dyn QuoteSink>,
    budgets: QuoteBudgets,
}

impl QuotePipeline {
    pub fn new(source: Arc<dyn QuoteSource>, sink: Arc<dyn QuoteSink>, budgets: QuoteBudgets) -> Self {
        Self {
            source,
            sink,
            budgets,
        }
    }

    /// Fetch the latest bid and log it. The log outcome never changes the result.
    pub async fn latest(&self, deadline: &Deadline) -> Result<Quote, QuoteError> {
        let fetch = deadline.child(self.budgets.fetch);
        let bid = match self.source.latest_bid(&fetch).await {
            Ok(bid) => bid,
            Err(e) => {
                if e.is_deadline() {
                    warn!(budget = ?self.budgets.fetch, error = %e, "quote fetch deadline exceeded");
                } else {
                    warn!(error = %e, "quote fetch failed");
                }
                return Err(QuoteError::from(&e));
            }
        };

        let persist = deadline.child(self.budgets.persist);
        match self.sink.record(&bid, &persist).await {
            Ok(()) => debug!(%bid, "quote recorded"),
            Err(SinkError::Deadline(DeadlineError::Expired)) => {
                warn!(budget = ?self.budgets.persist, "quote insert deadline exceeded");
            }
            Err(e) => warn!(error = %e, "quote insert failed"),
        }

        Ok(Quote { bid })
    }
}
