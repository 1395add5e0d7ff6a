//! Logging and trace export.
//!
//! [`init`] installs the `tracing` subscriber and, when an OTLP endpoint is
//! given, an OpenTelemetry layer exporting spans over gRPC. The returned
//! [`Telemetry`] owns the tracer provider; call [`Telemetry::shutdown`]
//! before exit to flush pending spans.

use anyhow::Context;
use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Handle to the process tracing pipeline.
#[must_use = "call shutdown() to flush spans before exit"]
pub struct Telemetry {
    provider: Option<SdkTracerProvider>,
}

/// Install logging for `service_name`, exporting spans to `otlp_endpoint` if set.
pub fn init(service_name: &'static str, otlp_endpoint: Option<&str>) -> anyhow::Result<Telemetry> {
    let provider = match otlp_endpoint {
        Some(endpoint) => Some(build_provider(service_name, endpoint)?),
        None => None,
    };

    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(service_name)));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    if let Some(endpoint) = otlp_endpoint {
        tracing::info!(service = service_name, %endpoint, "OTLP trace export enabled");
    }

    Ok(Telemetry { provider })
}

fn build_provider(service_name: &'static str, endpoint: &str) -> anyhow::Result<SdkTracerProvider> {
    // W3C traceparent in and out of every HTTP hop
    global::set_text_map_propagator(TraceContextPropagator::new());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .context("failed to build OTLP exporter")?;

    let resource = Resource::builder_empty()
        .with_attributes([KeyValue::new("service.name", service_name)])
        .build();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

impl Telemetry {
    /// Flush and stop the exporter. A no-op when export is disabled.
    pub fn shutdown(self) -> anyhow::Result<()> {
        if let Some(provider) = self.provider {
            provider
                .shutdown()
                .map_err(|e| anyhow::anyhow!("failed to shut down tracer provider: {e}"))?;
        }
        Ok(())
    }
}
