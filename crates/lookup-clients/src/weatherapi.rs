//! WeatherAPI temperature source.

use async_trait::async_trait;
use lookup_core::weather::{Locality, TemperatureSource};
use lookup_core::{ClientError, ClientResult, Deadline};
use serde::Deserialize;
use url::Url;

use crate::endpoint;
use crate::propagation::trace_headers;

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
}

/// Temperature source backed by `GET /v1/current.json`.
pub struct WeatherApiClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(client: reqwest::Client, base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url,
            api_key: api_key.into(),
        }
    }

    fn current_url(&self, locality: &Locality) -> String {
        let query = format!("{},{},BR", locality.city, locality.uf);
        endpoint(
            &self.base_url,
            &format!(
                "v1/current.json?key={}&q={}&aqi=no",
                urlencoding::encode(&self.api_key),
                urlencoding::encode(&query)
            ),
        )
    }

    async fn fetch(&self, url: String) -> ClientResult<f64> {
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

        let body: CurrentResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                ClientError::Decode(e.to_string())
            } else {
                ClientError::Request(e.to_string())
            }
        })?;

        Ok(body.current.temp_c)
    }
}

#[async_trait]
impl TemperatureSource for WeatherApiClient {
    async fn current_celsius(&self, locality: &Locality, deadline: &Deadline) -> ClientResult<f64> {
        let url = self.current_url(locality);
        deadline.run(self.fetch(url)).await?
    }
}
