//! Metrics collection and exposition.
//!
//! # Metrics
//! - `image_proxy_requests_total` (counter): requests by outcome, status
//! - `image_proxy_request_duration_seconds` (histogram): latency by outcome
//! - `image_proxy_source_bytes` (histogram): fetched source sizes
//! - `image_proxy_transform_duration_seconds` (histogram): CPU time by mode
//!
//! # Design Decisions
//! - Outcome label is the terminal pipeline state
//! - Prometheus exporter runs its own HTTP listener when enabled

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::params::Mode;
use crate::pipeline::Stage;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(outcome: Stage, status: u16, start: Instant) {
    counter!(
        "image_proxy_requests_total",
        "outcome" => outcome.as_str(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "image_proxy_request_duration_seconds",
        "outcome" => outcome.as_str()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the size of a fetched source image.
pub fn record_source_bytes(len: usize) {
    histogram!("image_proxy_source_bytes").record(len as f64);
}

/// Record time spent in decode/transform/encode.
pub fn record_transform(mode: Mode, start: Instant) {
    histogram!(
        "image_proxy_transform_duration_seconds",
        "mode" => mode.as_str()
    )
    .record(start.elapsed().as_secs_f64());
}
