//! ViaCEP resolver: CEP → city and state.

use async_trait::async_trait;
use lookup_core::weather::{Locality, Resolution, Resolver};
use lookup_core::{ClientError, ClientResult, Deadline, Identifier};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::endpoint;
use crate::propagation::trace_headers;

/// Body of `GET /ws/{cep}/json/`.
#[derive(Debug, Default, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    /// `true` (or `"true"`) for a well-formed but unknown CEP.
    #[serde(default)]
    erro: Option<Value>,
}

impl ViaCepResponse {
    fn into_resolution(self) -> Resolution {
        let flagged = match &self.erro {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        };
        if flagged || self.localidade.is_empty() || self.uf.is_empty() {
            return Resolution::NotFound;
        }
        Resolution::Found(Locality {
            city: self.localidade,
            uf: self.uf,
        })
    }
}

/// Resolver backed by the ViaCEP web service.
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ViaCepClient {
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn lookup_url(&self, id: &Identifier) -> String {
        endpoint(&self.base_url, &format!("ws/{}/json/", id.as_str()))
    }

    async fn lookup(&self, url: String) -> ClientResult<Resolution> {
        let response = self
            .client
            .get(&url)
            .headers(trace_headers())
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        // An upstream error status means the CEP is unknown, not that we failed.
        if !response.status().is_success() {
            debug!(status = %response.status(), "resolver answered with error status");
            return Ok(Resolution::NotFound);
        }

        match response.json::<ViaCepResponse>().await {
            Ok(body) => Ok(body.into_resolution()),
            Err(e) => {
                debug!(error = %e, "undecodable resolver response");
                Ok(Resolution::NotFound)
            }
        }
    }
}

#[async_trait]
impl Resolver for ViaCepClient {
    async fn resolve(&self, id: &Identifier, deadline: &Deadline) -> ClientResult<Resolution> {
        let url = self.lookup_url(id);
        deadline.run(self.lookup(url)).await?
    }
}
