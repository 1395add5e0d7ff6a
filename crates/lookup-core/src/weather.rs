//! Weather lookup types and the two capabilities the aggregator depends on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ClientResult, Deadline, Identifier};

/// Locality a CEP resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    pub city: String,
    /// Two-letter state code.
    pub uf: String,
}

/// Outcome of a resolver call that reached the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Locality),
    NotFound,
}

/// Maps a validated identifier to a locality.
///
/// Transport failures are `Err`; an unknown identifier is `Ok(Resolution::NotFound)`.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, id: &Identifier, deadline: &Deadline) -> ClientResult<Resolution>;
}

/// Current temperature, in Celsius, for a locality.
#[async_trait]
pub trait TemperatureSource: Send + Sync {
    async fn current_celsius(&self, locality: &Locality, deadline: &Deadline) -> ClientResult<f64>;
}

/// Round to one decimal place, halves away from zero.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 1.8 + 32.0
}

pub fn celsius_to_kelvin(c: f64) -> f64 {
    c + 273.0
}

/// Successful weather lookup. Built only from a Celsius reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    city: String,
    #[serde(rename = "temp_C")]
    temp_c: f64,
    #[serde(rename = "temp_F")]
    temp_f: f64,
    #[serde(rename = "temp_K")]
    temp_k: f64,
}

impl WeatherReport {
    /// Derive Fahrenheit and Kelvin from the unrounded reading, then round all three.
    pub fn from_celsius(city: impl Into<String>, celsius: f64) -> Self {
        Self {
            city: city.into(),
            temp_c: round1(celsius),
            temp_f: round1(celsius_to_fahrenheit(celsius)),
            temp_k: round1(celsius_to_kelvin(celsius)),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn temp_c(&self) -> f64 {
        self.temp_c
    }

    pub fn temp_f(&self) -> f64 {
        self.temp_f
    }

    pub fn temp_k(&self) -> f64 {
        self.temp_k
    }
}
