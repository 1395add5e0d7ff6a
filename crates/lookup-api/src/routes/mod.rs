//! Routers for the three services.

pub mod gateway;
pub mod health;
pub mod quote;
pub mod weather;

use crate::trace::make_span;
use crate::{GatewayState, QuoteState, WeatherState};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Router for `lookup-weather`.
pub fn weather_router(state: WeatherState) -> Router {
    Router::new()
        .merge(weather::router())
        .merge(health::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
}

/// Router for `lookup-gateway`.
pub fn gateway_router(state: GatewayState) -> Router {
    Router::new()
        .merge(gateway::router())
        .merge(health::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
}

/// Router for `lookup-quote`.
pub fn quote_router(state: QuoteState) -> Router {
    Router::new()
        .merge(quote::router())
        .merge(health::db_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
}
