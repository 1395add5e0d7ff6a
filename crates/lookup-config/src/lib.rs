//! Configuration for the lookup services.
//!
//! Settings are layered: built-in defaults, then an optional KDL file
//! (`lookup.kdl`), then environment variables. Binaries apply their own
//! command-line flags on top.

pub mod env;
pub mod error;
pub mod file;
pub mod services;

pub use error::{ConfigError, ConfigResult};
pub use services::{ClientConfig, GatewayConfig, LookupConfig, QuoteConfig, WeatherConfig};

use std::path::Path;

/// Load defaults, overlay `path` if given, then the process environment.
pub fn load(path: Option<&Path>) -> ConfigResult<LookupConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            file::parse_config(&text)?
        }
        None => LookupConfig::default(),
    };
    env::apply(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}
