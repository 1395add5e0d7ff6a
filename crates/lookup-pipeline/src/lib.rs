//! Lookup orchestration.
//!
//! - [`WeatherAggregator`]: validate → resolve → fetch → compute
//! - [`QuotePipeline`]: fetch → best-effort persist

pub mod quote;
pub mod weather;

pub use quote::{QuoteBudgets, QuotePipeline};
pub use weather::{LookupStage, WeatherAggregator, WeatherBudgets};
