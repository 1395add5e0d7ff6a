//! Lookup CLI tool.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

mod commands;

#[derive(Parser)]
#[command(name = "lookup")]
#[command(about = "Client for the lookup services", long_about = None)]
struct Cli {
    /// Path to a lookup.kdl configuration file
    #[arg(long, env = "LOOKUP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the current USD-BRL bid and write it to a file
    Quote {
        /// Quote endpoint
        #[arg(long)]
        server_url: Option<Url>,
        /// Output file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Look up the temperature for a CEP through the gateway
    Weather {
        /// Eight-digit CEP
        cep: String,
        /// Gateway base URL
        #[arg(long, env = "LOOKUP_GATEWAY_URL", default_value = "http://localhost:8080")]
        gateway_url: Url,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = lookup_config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let client = lookup_clients::http_client().context("failed to build HTTP client")?;

    match cli.command {
        Commands::Quote { server_url, out } => {
            let mut config = config.client;
            if let Some(url) = server_url {
                config.server_url = url;
            }
            if let Some(out) = out {
                config.out_file = out;
            }
            let bid = commands::quote::run(&client, &config).await?;
            println!("Dólar: {bid}");
        }
        Commands::Weather { cep, gateway_url } => {
            let reply =
                commands::weather::run(&client, &gateway_url, &cep, config.gateway.request_budget).await?;
            println!("{}", reply.status);
            println!("{}", reply.body);
        }
    }

    Ok(())
}
