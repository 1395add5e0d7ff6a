//! Gateway service: `POST /` with `{"cep": ...}`, relayed to the weather service.

use anyhow::Context;
use clap::Parser;
use lookup_api::cli::ServiceArgs;
use lookup_api::{GatewayState, routes, serve, telemetry};
use lookup_clients::http_client;
use tracing::info;

#[derive(Parser)]
#[command(name = "lookup-gateway")]
#[command(about = "Validating gateway in front of the weather service", long_about = None)]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let telemetry = telemetry::init("lookup-gateway", cli.service.otlp_endpoint.as_deref())?;

    let config = lookup_config::load(cli.service.config.as_deref())
        .context("failed to load configuration")?
        .gateway;
    info!(weather_url = %config.weather_url, "forwarding to weather service");

    let state = GatewayState {
        client: http_client().context("failed to build HTTP client")?,
        weather_url: config.weather_url,
        request_budget: config.request_budget,
    };

    let addr = cli.service.listen_addr(config.listen);
    serve::serve(addr, routes::gateway_router(state)).await?;

    telemetry.shutdown()
}
