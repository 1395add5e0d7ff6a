//! HTTP services for the lookup pipelines.
//!
//! Three binaries share this crate:
//! - `lookup-weather`: `GET /weather/{cep}`
//! - `lookup-gateway`: `POST /` relaying to the weather service
//! - `lookup-quote`: `GET /cotacao`

pub mod cli;
pub mod error;
pub mod routes;
pub mod serve;
pub mod state;
pub mod telemetry;
pub mod trace;

pub use state::{GatewayState, QuoteState, WeatherState};
