//! Environment overrides.

use url::Url;

use crate::{ConfigError, ConfigResult, LookupConfig};

/// Aggregator base URL used by the gateway.
pub const SERVICE_B_URL: &str = "SERVICE_B_URL";
/// Key for the temperature API. Empty is accepted.
pub const WEATHERAPI_KEY: &str = "WEATHERAPI_KEY";
pub const VIACEP_URL: &str = "VIACEP_URL";
pub const WEATHERAPI_URL: &str = "WEATHERAPI_URL";
pub const QUOTE_API_URL: &str = "QUOTE_API_URL";
pub const QUOTE_DB: &str = "QUOTE_DB";

/// Apply overrides read through `lookup`. Empty values are ignored, except
/// for the API key which is taken as-is.
pub fn apply<F>(config: &mut LookupConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(raw) = non_empty(SERVICE_B_URL) {
        config.gateway.weather_url = parse_url(SERVICE_B_URL, &raw)?;
    }
    if let Some(raw) = non_empty(VIACEP_URL) {
        config.weather.viacep_url = parse_url(VIACEP_URL, &raw)?;
    }
    if let Some(raw) = non_empty(WEATHERAPI_URL) {
        config.weather.weatherapi_url = parse_url(WEATHERAPI_URL, &raw)?;
    }
    if let Some(key) = lookup(WEATHERAPI_KEY) {
        config.weather.weatherapi_key = key;
    }
    if let Some(raw) = non_empty(QUOTE_API_URL) {
        config.quote.api_url = parse_url(QUOTE_API_URL, &raw)?;
    }
    if let Some(path) = non_empty(QUOTE_DB) {
        config.quote.db_path = path.into();
    }
    Ok(())
}

fn parse_url(field: &str, raw: &str) -> ConfigResult<Url> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = LookupConfig::default();
        apply(
            &mut config,
            env(&[
                ("SERVICE_B_URL", "http://service-b:8080"),
                ("WEATHERAPI_KEY", "abc"),
                ("QUOTE_DB", "/data/quotes.db"),
            ]),
        )
        .unwrap();

        assert_eq!(config.gateway.weather_url.as_str(), "http://service-b:8080/");
        assert_eq!(config.weather.weatherapi_key, "abc");
        assert_eq!(config.quote.db_path.to_str(), Some("/data/quotes.db"));
    }

    #[test]
    fn test_empty_service_url_keeps_default() {
        let mut config = LookupConfig::default();
        apply(&mut config, env(&[("SERVICE_B_URL", "")])).unwrap();
        assert_eq!(config.gateway.weather_url.as_str(), "http://localhost:8081/");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut config = LookupConfig::default();
        let err = apply(&mut config, env(&[("VIACEP_URL", "::nope")])).unwrap_err();
        assert!(err.to_string().contains("VIACEP_URL"));
    }
}
