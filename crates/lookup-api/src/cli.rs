//! Flags shared by the service binaries.

use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ServiceArgs {
    /// Path to a lookup.kdl configuration file
    #[arg(long, env = "LOOKUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on (overrides the configured listen port)
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// OTLP/gRPC collector endpoint; tracing export is off when unset
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl ServiceArgs {
    /// Apply `--port` to a configured listen address.
    pub fn listen_addr(&self, configured: SocketAddr) -> SocketAddr {
        match self.port {
            Some(port) => SocketAddr::new(configured.ip(), port),
            None => configured,
        }
    }
}
