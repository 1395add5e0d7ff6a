//! Error types for the lookup pipeline.

use thiserror::Error;

/// Terminal failure of a weather lookup.
///
/// Carries no transport detail; that stays in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("invalid zipcode")]
    InvalidIdentifier,

    #[error("can not find zipcode")]
    NotFound,

    #[error("weather fetch error")]
    FetchFailed,

    #[error("internal error")]
    Internal,
}

/// Why a deadline-bounded call did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeadlineError {
    #[error("deadline exceeded")]
    Expired,

    #[error("cancelled")]
    Cancelled,
}

/// Failure of a single outbound call made by a client adapter.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Deadline(#[from] DeadlineError),
}

impl ClientError {
    /// True when the call was cut short by its deadline or by cancellation.
    pub fn is_deadline(&self) -> bool {
        matches!(self, ClientError::Deadline(_))
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Failure of the best-effort quote log.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Deadline(#[from] DeadlineError),
}

/// Terminal failure of a quote lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// The quote API could not be reached within budget.
    #[error("quote upstream unavailable")]
    Unavailable,

    /// The quote API answered with something that is not a quote document.
    #[error("invalid quote response")]
    InvalidResponse,

    /// The quote document decoded but carried no bid.
    #[error("quote response without bid")]
    MissingBid,
}

impl From<&ClientError> for QuoteError {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Request(_) | ClientError::Deadline(_) => QuoteError::Unavailable,
            ClientError::Status(_) | ClientError::Decode(_) => QuoteError::InvalidResponse,
            ClientError::MissingField(_) => QuoteError::MissingBid,
        }
    }
}
