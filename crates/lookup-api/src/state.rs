//! Application state for each service.

use lookup_pipeline::{QuotePipeline, WeatherAggregator};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Weather service state.
#[derive(Clone)]
pub struct WeatherState {
    pub aggregator: Arc<WeatherAggregator>,
    /// End-to-end budget for one `GET /weather/{cep}`.
    pub request_budget: Duration,
}

/// Gateway state.
#[derive(Clone)]
pub struct GatewayState {
    pub client: reqwest::Client,
    /// Base URL of the weather service.
    pub weather_url: Url,
    pub request_budget: Duration,
}

/// Quote service state.
#[derive(Clone)]
pub struct QuoteState {
    pub pipeline: Arc<QuotePipeline>,
    pub pool: SqlitePool,
    pub request_budget: Duration,
}
