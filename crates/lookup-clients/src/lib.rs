//! HTTP adapters for the external APIs behind the lookup pipelines.
//!
//! Each adapter issues exactly one request per call and enforces the
//! [`Deadline`](lookup_core::Deadline) it is handed: when the deadline
//! expires or is cancelled the in-flight request is dropped.

pub mod awesome;
pub mod propagation;
pub mod viacep;
pub mod weatherapi;

pub use awesome::AwesomeQuoteClient;
pub use viacep::ViaCepClient;
pub use weatherapi::WeatherApiClient;

/// Shared HTTP client. Timeouts come from per-call deadlines, not from here.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("lookup/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Join `path` onto `base`, tolerating a trailing slash on either side.
pub fn endpoint(base: &url::Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let base = url::Url::parse("http://host:1234").unwrap();
        assert_eq!(endpoint(&base, "/ws/1/json/"), "http://host:1234/ws/1/json/");

        let base = url::Url::parse("http://host/prefix/").unwrap();
        assert_eq!(endpoint(&base, "v1/x"), "http://host/prefix/v1/x");
    }
}
