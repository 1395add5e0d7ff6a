//! Per-request spans.

use axum::extract::Request;
use lookup_clients::propagation::parent_context;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use uuid::Uuid;

/// Span for an inbound request, parented to the caller's trace if it sent one.
pub fn make_span(request: &Request) -> Span {
    let span = tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %Uuid::now_v7(),
    );
    let _ = span.set_parent(parent_context(request.headers()));
    span
}
