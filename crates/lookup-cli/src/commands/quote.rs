//! One-shot quote fetch.

use anyhow::{Context, Result, bail};
use lookup_config::ClientConfig;
use lookup_core::Deadline;
use lookup_core::quote::Quote;
use reqwest::StatusCode;
use std::path::Path;
use url::Url;

/// Fetch the quote, require a usable bid, write it to the configured file.
pub async fn run(client: &reqwest::Client, config: &ClientConfig) -> Result<String> {
    let deadline = Deadline::after(config.request_budget);
    let quote = deadline
        .run(fetch(client, &config.server_url))
        .await
        .with_context(|| format!("no quote within {:?}", config.request_budget))??;

    write_quote(&config.out_file, &quote.bid)?;
    tracing::info!(bid = %quote.bid, path = %config.out_file.display(), "quote saved");
    Ok(quote.bid)
}

async fn fetch(client: &reqwest::Client, url: &Url) -> Result<Quote> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        bail!("quote server answered {status}: {body}");
    }

    let quote: Quote = response.json().await.context("invalid quote payload")?;
    if quote.bid.is_empty() {
        bail!("quote server returned an empty bid");
    }
    Ok(quote)
}

fn write_quote(path: &Path, bid: &str) -> Result<()> {
    std::fs::write(path, format!("Dólar: {bid}\n"))
        .with_context(|| format!("failed to write {}", path.display()))
}
