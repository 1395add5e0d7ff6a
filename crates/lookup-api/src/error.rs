//! API error handling.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lookup_core::{PipelineError, QuoteError};

/// Every non-success outcome the services expose. Bodies are fixed,
/// plain-text strings; upstream detail never reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    InvalidZipcode,
    ZipcodeNotFound,
    Internal,
    /// Gateway could not reach the weather service.
    WeatherUnavailable,
    QuoteTimeout,
    QuoteInvalidResponse,
    QuoteMissingBid,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            ApiError::InvalidZipcode => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ZipcodeNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::WeatherUnavailable => StatusCode::BAD_GATEWAY,
            ApiError::QuoteTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::QuoteInvalidResponse | ApiError::QuoteMissingBid => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ApiError::InvalidZipcode => "invalid zipcode",
            ApiError::ZipcodeNotFound => "can not find zipcode",
            ApiError::Internal => "internal error",
            ApiError::WeatherUnavailable => "service b unavailable",
            ApiError::QuoteTimeout => "timeout ao consultar cotação",
            ApiError::QuoteInvalidResponse => "resposta inválida da API",
            ApiError::QuoteMissingBid => "dados indisponíveis",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidIdentifier => ApiError::InvalidZipcode,
            PipelineError::NotFound => ApiError::ZipcodeNotFound,
            PipelineError::FetchFailed | PipelineError::Internal => ApiError::Internal,
        }
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::Unavailable => ApiError::QuoteTimeout,
            QuoteError::InvalidResponse => ApiError::QuoteInvalidResponse,
            QuoteError::MissingBid => ApiError::QuoteMissingBid,
        }
    }
}
