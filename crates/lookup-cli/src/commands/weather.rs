//! Weather lookup through the gateway.

use anyhow::{Context, Result};
use lookup_core::Deadline;
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Gateway answer, as received.
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

/// Post `cep` to the gateway and return whatever it answers.
pub async fn run(client: &reqwest::Client, gateway_url: &Url, cep: &str, budget: Duration) -> Result<Reply> {
    let deadline = Deadline::after(budget);
    let call = async {
        let response = client
            .post(gateway_url.as_str())
            .json(&json!({ "cep": cep }))
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok::<_, reqwest::Error>(Reply { status, body })
    };

    let reply = deadline
        .run(call)
        .await
        .with_context(|| format!("gateway did not answer within {budget:?}"))?
        .with_context(|| format!("request to {gateway_url} failed"))?;
    Ok(reply)
}
