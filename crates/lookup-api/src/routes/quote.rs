//! `GET /cotacao`.

use crate::QuoteState;
use crate::error::ApiError;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use lookup_core::Deadline;
use lookup_core::quote::Quote;

pub fn router() -> Router<QuoteState> {
    Router::new().route("/cotacao", get(cotacao))
}

async fn cotacao(State(state): State<QuoteState>) -> Result<Json<Quote>, ApiError> {
    let deadline = Deadline::after(state.request_budget);
    let _guard = deadline.guard();

    let quote = state.pipeline.latest(&deadline).await?;
    tracing::info!(bid = %quote.bid, "quote served");
    Ok(Json(quote))
}
