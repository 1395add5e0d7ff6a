//! Per-service settings and their defaults.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::{ConfigError, ConfigResult};

/// Settings for every binary in the workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    pub weather: WeatherConfig,
    pub gateway: GatewayConfig,
    pub quote: QuoteConfig,
    pub client: ClientConfig,
}

/// CEP → weather aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub listen: SocketAddr,
    pub viacep_url: Url,
    pub weatherapi_url: Url,
    /// Not checked at startup; an empty key surfaces as a failed fetch.
    pub weatherapi_key: String,
    pub request_budget: Duration,
    pub resolve_budget: Duration,
    pub fetch_budget: Duration,
}

/// Front service relaying `POST /` to the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub listen: SocketAddr,
    pub weather_url: Url,
    pub request_budget: Duration,
}

/// USD-BRL quote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub listen: SocketAddr,
    pub api_url: Url,
    pub db_path: PathBuf,
    pub request_budget: Duration,
    pub fetch_budget: Duration,
    pub persist_budget: Duration,
}

/// One-shot quote client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server_url: Url,
    pub out_file: PathBuf,
    pub request_budget: Duration,
}

fn default_url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8081)),
            viacep_url: default_url("https://viacep.com.br"),
            weatherapi_url: default_url("https://api.weatherapi.com"),
            weatherapi_key: String::new(),
            request_budget: Duration::from_secs(2),
            resolve_budget: Duration::from_secs(1),
            fetch_budget: Duration::from_secs(1),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            weather_url: default_url("http://localhost:8081"),
            request_budget: Duration::from_secs(8),
        }
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            api_url: default_url("https://economia.awesomeapi.com.br"),
            db_path: PathBuf::from("quotes.db"),
            request_budget: Duration::from_secs(2),
            fetch_budget: Duration::from_millis(200),
            persist_budget: Duration::from_millis(10),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_url("http://localhost:8080/cotacao"),
            out_file: PathBuf::from("cotacao.txt"),
            request_budget: Duration::from_millis(300),
        }
    }
}

impl LookupConfig {
    /// Reject budgets that cannot be carved out of their parent.
    pub fn validate(&self) -> ConfigResult<()> {
        check_sub_budget(
            "weather.budget.resolve",
            self.weather.resolve_budget,
            self.weather.request_budget,
        )?;
        check_sub_budget(
            "weather.budget.fetch",
            self.weather.fetch_budget,
            self.weather.request_budget,
        )?;
        check_sub_budget(
            "quote.budget.fetch",
            self.quote.fetch_budget,
            self.quote.request_budget,
        )?;
        // The quote log must always expire strictly before the request does.
        if self.quote.persist_budget >= self.quote.request_budget {
            return Err(ConfigError::InvalidValue {
                field: "quote.budget.persist".to_string(),
                message: "must be shorter than the request budget".to_string(),
            });
        }
        for (field, budget) in [
            ("weather.budget.request", self.weather.request_budget),
            ("gateway.budget.request", self.gateway.request_budget),
            ("quote.budget.request", self.quote.request_budget),
            ("client.budget.request", self.client.request_budget),
        ] {
            if budget.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn check_sub_budget(field: &str, budget: Duration, parent: Duration) -> ConfigResult<()> {
    if budget > parent {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!(
                "{}ms exceeds the request budget of {}ms",
                budget.as_millis(),
                parent.as_millis()
            ),
        });
    }
    Ok(())
}
