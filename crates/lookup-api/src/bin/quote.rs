//! Quote service: `GET /cotacao`, logging each bid to SQLite.

use anyhow::Context;
use clap::Parser;
use lookup_api::cli::ServiceArgs;
use lookup_api::{QuoteState, routes, serve, telemetry};
use lookup_clients::{AwesomeQuoteClient, http_client};
use lookup_db::{SqliteQuoteSink, create_pool, run_migrations};
use lookup_pipeline::{QuoteBudgets, QuotePipeline};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "lookup-quote")]
#[command(about = "USD-BRL quote service", long_about = None)]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let telemetry = telemetry::init("lookup-quote", cli.service.otlp_endpoint.as_deref())?;

    let config = lookup_config::load(cli.service.config.as_deref())
        .context("failed to load configuration")?
        .quote;

    info!(path = %config.db_path.display(), "Opening database...");
    let pool = create_pool(&config.db_path)
        .await
        .context("failed to open quote database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;
    info!("Database ready");

    let source = AwesomeQuoteClient::new(
        http_client().context("failed to build HTTP client")?,
        config.api_url.clone(),
    );
    let pipeline = QuotePipeline::new(
        Arc::new(source),
        Arc::new(SqliteQuoteSink::new(pool.clone())),
        QuoteBudgets {
            fetch: config.fetch_budget,
            persist: config.persist_budget,
        },
    );

    let state = QuoteState {
        pipeline: Arc::new(pipeline),
        pool: pool.clone(),
        request_budget: config.request_budget,
    };

    let addr = cli.service.listen_addr(config.listen);
    serve::serve(addr, routes::quote_router(state)).await?;

    pool.close().await;
    telemetry.shutdown()
}
