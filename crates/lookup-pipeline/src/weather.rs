//! CEP → weather aggregator.

use lookup_core::weather::{Locality, Resolution, Resolver, TemperatureSource, WeatherReport};
use lookup_core::{ClientError, Deadline, Identifier, PipelineError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sub-budgets for the two network stages, carved from the request deadline.
#[derive(Debug, Clone, Copy)]
pub struct WeatherBudgets {
    pub resolve: Duration,
    pub fetch: Duration,
}

impl Default for WeatherBudgets {
    fn default() -> Self {
        Self {
            resolve: Duration::from_secs(1),
            fetch: Duration::from_secs(1),
        }
    }
}

/// Stage a lookup is in. Errors can only terminate the first three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    Validating,
    Resolving,
    Fetching,
    Computing,
    Done,
}

enum State<'a> {
    Validating(&'a str),
    Resolving(Identifier),
    Fetching(Locality),
    Computing { city: String, celsius: f64 },
    Done(WeatherReport),
}

impl State<'_> {
    fn stage(&self) -> LookupStage {
        match self {
            State::Validating(_) => LookupStage::Validating,
            State::Resolving(_) => LookupStage::Resolving,
            State::Fetching(_) => LookupStage::Fetching,
            State::Computing { .. } => LookupStage::Computing,
            State::Done(_) => LookupStage::Done,
        }
    }
}

/// Orchestrates one weather lookup per call. Never retries a stage.
pub struct WeatherAggregator {
    resolver: Arc<dyn Resolver>,
    weather: Arc<dyn TemperatureSource>,
    budgets: WeatherBudgets,
}

impl WeatherAggregator {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        weather: Arc<dyn TemperatureSource>,
        budgets: WeatherBudgets,
    ) -> Self {
        Self {
            resolver,
            weather,
            budgets,
        }
    }

    /// Run the lookup for `raw` within `deadline`.
    pub async fn lookup(&self, raw: &str, deadline: &Deadline) -> Result<WeatherReport, PipelineError> {
        let mut state = State::Validating(raw);
        loop {
            debug!(stage = ?state.stage(), "lookup stage");
            state = match state {
                State::Validating(raw) => State::Resolving(Identifier::parse(raw)?),
                State::Resolving(id) => State::Fetching(self.resolve(&id, deadline).await?),
                State::Fetching(locality) => {
                    let celsius = self.fetch(&locality, deadline).await?;
                    State::Computing {
                        city: locality.city,
                        celsius,
                    }
                }
                State::Computing { city, celsius } => {
                    State::Done(WeatherReport::from_celsius(city, celsius))
                }
                State::Done(report) => return Ok(report),
            };
        }
    }

    async fn resolve(&self, id: &Identifier, deadline: &Deadline) -> Result<Locality, PipelineError> {
        let stage = deadline.child(self.budgets.resolve);
        match self.resolver.resolve(id, &stage).await {
            Ok(Resolution::Found(locality)) => {
                debug!(cep = %id, city = %locality.city, uf = %locality.uf, "cep resolved");
                Ok(locality)
            }
            Ok(Resolution::NotFound) => {
                info!(cep = %id, "cep not found");
                Err(PipelineError::NotFound)
            }
            Err(e) => {
                log_client_error("resolve", &e);
                Err(PipelineError::Internal)
            }
        }
    }

    async fn fetch(&self, locality: &Locality, deadline: &Deadline) -> Result<f64, PipelineError> {
        let stage = deadline.child(self.budgets.fetch);
        self.weather
            .current_celsius(locality, &stage)
            .await
            .map_err(|e| {
                log_client_error("fetch", &e);
                PipelineError::FetchFailed
            })
    }
}

fn log_client_error(stage: &'static str, err: &ClientError) {
    if err.is_deadline() {
        warn!(stage, error = %err, "stage deadline exceeded or cancelled");
    } else {
        warn!(stage, error = %err, "stage failed");
    }
}
