//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by resource, method, status
//! - `gateway_request_duration_seconds` (histogram): backend round trip by resource
//! - `gateway_proxy_failures_total` (counter): gateway-level failures by kind
//!
//! Without an installed recorder every call below is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Record one proxied request, whatever its outcome.
pub fn record_request(resource: &str, method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "resource" => resource.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "gateway_request_duration_seconds",
        "resource" => resource.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a failure turned into the error envelope.
pub fn record_failure(kind: &'static str) {
    counter!("gateway_proxy_failures_total", "kind" => kind).increment(1);
}
