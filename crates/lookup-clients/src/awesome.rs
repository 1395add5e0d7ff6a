//! AwesomeAPI USD-BRL quote source.

use async_trait::async_trait;
use lookup_core::quote::QuoteSource;
use lookup_core::{ClientError, ClientResult, Deadline};
use serde::Deserialize;
use url::Url;

use crate::endpoint;
use crate::propagation::trace_headers;

/// Body of `GET /json/last/USD-BRL`. Absent keys decode as empty so a
/// well-formed document without a bid is told apart from garbage.
#[derive(Debug, Default, Deserialize)]
struct LastResponse {
    #[serde(rename = "USDBRL", default)]
    usdbrl: Pair,
}

#[derive(Debug, Default, Deserialize)]
struct Pair {
    #[serde(default)]
    bid: String,
}

pub struct AwesomeQuoteClient {
    client: reqwest::Client,
    base_url: Url,
}

impl AwesomeQuoteClient {
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    async fn fetch(&self, url: String) -> ClientResult<String> {
        let response = self
            .client
            .get(&url)
            .headers(trace_headers())
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }

        let body: LastResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                ClientError::Decode(e.to_string())
            } else {
                ClientError::Request(e.to_string())
            }
        })?;

        if body.usdbrl.bid.is_empty() {
            return Err(ClientError::MissingField("USDBRL.bid"));
        }
        Ok(body.usdbrl.bid)
    }
}

#[async_trait]
impl QuoteSource for AwesomeQuoteClient {
    async fn latest_bid(&self, deadline: &Deadline) -> ClientResult<String> {
        let url = endpoint(&self.base_url, "json/last/USD-BRL");
        deadline.run(self.fetch(url)).await?
    }
}
