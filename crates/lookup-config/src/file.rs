//! `lookup.kdl` parsing.
//!
//! ```kdl
//! weather {
//!     listen "0.0.0.0:8081"
//!     viacep-url "https://viacep.com.br"
//!     weatherapi-url "https://api.weatherapi.com"
//!     api-key "..."
//!     budget request=2000 resolve=1000 fetch=1000
//! }
//! gateway {
//!     listen "0.0.0.0:8080"
//!     weather-url "http://localhost:8081"
//!     budget request=8000
//! }
//! quote {
//!     api-url "https://economia.awesomeapi.com.br"
//!     db "quotes.db"
//!     budget request=2000 fetch=200 persist=10
//! }
//! client {
//!     server-url "http://localhost:8080/cotacao"
//!     out "cotacao.txt"
//!     budget request=300
//! }
//! ```
//!
//! Budgets are in milliseconds. Anything left out keeps its default.

use kdl::{KdlDocument, KdlNode};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::services::{ClientConfig, GatewayConfig, QuoteConfig, WeatherConfig};
use crate::{ConfigError, ConfigResult, LookupConfig};

/// Parse a configuration document on top of the defaults.
pub fn parse_config(kdl: &str) -> ConfigResult<LookupConfig> {
    let doc: KdlDocument = kdl.parse()?;
    let mut config = LookupConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "weather" => parse_weather(node, &mut config.weather)?,
            "gateway" => parse_gateway(node, &mut config.gateway)?,
            "quote" => parse_quote(node, &mut config.quote)?,
            "client" => parse_client(node, &mut config.client)?,
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(config)
}

fn parse_weather(node: &KdlNode, config: &mut WeatherConfig) -> ConfigResult<()> {
    for child in children(node) {
        match child.name().value() {
            "listen" => config.listen = parse_addr(child, "weather.listen")?,
            "viacep-url" => config.viacep_url = parse_url(child, "weather.viacep-url")?,
            "weatherapi-url" => {
                config.weatherapi_url = parse_url(child, "weather.weatherapi-url")?;
            }
            "api-key" => config.weatherapi_key = get_first_string_arg(child).unwrap_or_default(),
            "budget" => {
                set_budget(child, "request", &mut config.request_budget)?;
                set_budget(child, "resolve", &mut config.resolve_budget)?;
                set_budget(child, "fetch", &mut config.fetch_budget)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_gateway(node: &KdlNode, config: &mut GatewayConfig) -> ConfigResult<()> {
    for child in children(node) {
        match child.name().value() {
            "listen" => config.listen = parse_addr(child, "gateway.listen")?,
            "weather-url" => config.weather_url = parse_url(child, "gateway.weather-url")?,
            "budget" => set_budget(child, "request", &mut config.request_budget)?,
            _ => {}
        }
    }
    Ok(())
}

fn parse_quote(node: &KdlNode, config: &mut QuoteConfig) -> ConfigResult<()> {
    for child in children(node) {
        match child.name().value() {
            "listen" => config.listen = parse_addr(child, "quote.listen")?,
            "api-url" => config.api_url = parse_url(child, "quote.api-url")?,
            "db" => {
                if let Some(path) = get_first_string_arg(child) {
                    config.db_path = PathBuf::from(path);
                }
            }
            "budget" => {
                set_budget(child, "request", &mut config.request_budget)?;
                set_budget(child, "fetch", &mut config.fetch_budget)?;
                set_budget(child, "persist", &mut config.persist_budget)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_client(node: &KdlNode, config: &mut ClientConfig) -> ConfigResult<()> {
    for child in children(node) {
        match child.name().value() {
            "server-url" => config.server_url = parse_url(child, "client.server-url")?,
            "out" => {
                if let Some(path) = get_first_string_arg(child) {
                    config.out_file = PathBuf::from(path);
                }
            }
            "budget" => set_budget(child, "request", &mut config.request_budget)?,
            _ => {}
        }
    }
    Ok(())
}

// Helper functions for extracting values from KDL nodes

fn children(node: &KdlNode) -> impl Iterator<Item = &KdlNode> {
    node.children().into_iter().flat_map(|doc| doc.nodes())
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn required_string_arg(node: &KdlNode, field: &str) -> ConfigResult<String> {
    get_first_string_arg(node).ok_or_else(|| ConfigError::InvalidValue {
        field: field.to_string(),
        message: "expected a string argument".to_string(),
    })
}

fn parse_url(node: &KdlNode, field: &str) -> ConfigResult<Url> {
    let raw = required_string_arg(node, field)?;
    Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn parse_addr(node: &KdlNode, field: &str) -> ConfigResult<SocketAddr> {
    let raw = required_string_arg(node, field)?;
    raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn set_budget(node: &KdlNode, name: &str, target: &mut Duration) -> ConfigResult<()> {
    let Some(value) = node.get(name) else {
        return Ok(());
    };
    let millis = value
        .as_integer()
        .and_then(|ms| u64::try_from(ms).ok())
        .ok_or_else(|| ConfigError::InvalidValue {
            field: format!("budget.{name}"),
            message: format!("expected a non-negative number of milliseconds, got {value:?}"),
        })?;
    *target = Duration::from_millis(millis);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let kdl = r#"
            weather {
                listen "127.0.0.1:9001"
                viacep-url "http://resolver.local"
                weatherapi-url "http://weather.local"
                api-key "secret"
                budget request=1500 resolve=500 fetch=700
            }
            gateway {
                weather-url "http://weather:9001"
                budget request=3000
            }
            quote {
                db "/tmp/q.db"
                budget fetch=150 persist=5
            }
            client {
                out "out.txt"
            }
        "#;

        let config = parse_config(kdl).unwrap();
        assert_eq!(config.weather.listen, "127.0.0.1:9001".parse().unwrap());
        assert_eq!(config.weather.viacep_url.as_str(), "http://resolver.local/");
        assert_eq!(config.weather.weatherapi_key, "secret");
        assert_eq!(config.weather.request_budget, Duration::from_millis(1500));
        assert_eq!(config.weather.resolve_budget, Duration::from_millis(500));
        assert_eq!(config.weather.fetch_budget, Duration::from_millis(700));
        assert_eq!(config.gateway.weather_url.as_str(), "http://weather:9001/");
        assert_eq!(config.gateway.request_budget, Duration::from_secs(3));
        assert_eq!(config.quote.db_path, PathBuf::from("/tmp/q.db"));
        assert_eq!(config.quote.fetch_budget, Duration::from_millis(150));
        assert_eq!(config.quote.persist_budget, Duration::from_millis(5));
        // untouched
        assert_eq!(config.quote.request_budget, Duration::from_secs(2));
        assert_eq!(config.client.out_file, PathBuf::from("out.txt"));
    }

    #[test]
    fn test_empty_document_is_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.weather.viacep_url.as_str(), "https://viacep.com.br/");
        assert_eq!(config.client.request_budget, Duration::from_millis(300));
    }

    #[test]
    fn test_negative_budget_rejected() {
        let result = parse_config("quote { budget persist=-1 }");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_bad_url_rejected() {
        let result = parse_config(r#"gateway { weather-url "not a url" }"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_syntax_error() {
        let result = parse_config("weather {");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
