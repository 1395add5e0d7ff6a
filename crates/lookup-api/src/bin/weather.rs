//! Weather service: `GET /weather/{cep}`.

use anyhow::Context;
use clap::Parser;
use lookup_api::cli::ServiceArgs;
use lookup_api::{WeatherState, routes, serve, telemetry};
use lookup_clients::{ViaCepClient, WeatherApiClient, http_client};
use lookup_pipeline::{WeatherAggregator, WeatherBudgets};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "lookup-weather")]
#[command(about = "CEP to temperature lookup service", long_about = None)]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let telemetry = telemetry::init("lookup-weather", cli.service.otlp_endpoint.as_deref())?;

    let config = lookup_config::load(cli.service.config.as_deref())
        .context("failed to load configuration")?
        .weather;
    if config.weatherapi_key.is_empty() {
        info!("WEATHERAPI_KEY is empty; temperature lookups will be rejected upstream");
    }

    let client = http_client().context("failed to build HTTP client")?;
    let aggregator = WeatherAggregator::new(
        Arc::new(ViaCepClient::new(client.clone(), config.viacep_url.clone())),
        Arc::new(WeatherApiClient::new(
            client,
            config.weatherapi_url.clone(),
            config.weatherapi_key.clone(),
        )),
        WeatherBudgets {
            resolve: config.resolve_budget,
            fetch: config.fetch_budget,
        },
    );

    let state = WeatherState {
        aggregator: Arc::new(aggregator),
        request_budget: config.request_budget,
    };

    let addr = cli.service.listen_addr(config.listen);
    serve::serve(addr, routes::weather_router(state)).await?;

    telemetry.shutdown()
}
