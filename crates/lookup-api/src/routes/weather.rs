//! `GET /weather/{cep}`.

use crate::WeatherState;
use crate::error::ApiError;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use lookup_core::Deadline;
use lookup_core::weather::WeatherReport;

pub fn router() -> Router<WeatherState> {
    Router::new().route("/weather/{cep}", get(weather))
}

async fn weather(
    State(state): State<WeatherState>,
    cep: Result<Path<String>, PathRejection>,
) -> Result<Json<WeatherReport>, ApiError> {
    // A segment axum cannot decode is still just a malformed zipcode.
    let Path(cep) = cep.map_err(|e| {
        tracing::info!(error = %e, "rejected undecodable zipcode segment");
        ApiError::InvalidZipcode
    })?;

    let deadline = Deadline::after(state.request_budget);
    // Dropping the handler (client gone) cancels any in-flight stage.
    let _guard = deadline.guard();

    let report = state.aggregator.lookup(&cep, &deadline).await?;
    tracing::info!(%cep, city = report.city(), temp_c = report.temp_c(), "weather lookup complete");
    Ok(Json(report))
}
