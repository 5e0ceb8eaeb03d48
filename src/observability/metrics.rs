//! Metrics collection and exposition.
//!
//! # Metrics
//! - `subenum_source_attempts_total` (counter): request attempts by source
//! - `subenum_source_failures_total` (counter): sunk errors by source, kind
//! - `subenum_source_subdomains_total` (counter): names returned by source
//! - `subenum_source_duration_seconds` (histogram): time per source task
//! - `subenum_enumerations_total` (counter): calls by outcome
//! - `subenum_enumeration_duration_seconds` (histogram): time per call
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Duration;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_attempt(source: &str) {
    counter!("subenum_source_attempts_total", "source" => source.to_string()).increment(1);
}

pub fn record_source_failure(source: &str, kind: &'static str) {
    counter!(
        "subenum_source_failures_total",
        "source" => source.to_string(),
        "kind" => kind
    )
    .increment(1);
}

pub fn record_subdomains(source: &str, count: usize) {
    counter!("subenum_source_subdomains_total", "source" => source.to_string()).increment(count as u64);
}

pub fn record_source_duration(source: &str, elapsed: Duration) {
    histogram!("subenum_source_duration_seconds", "source" => source.to_string()).record(elapsed.as_secs_f64());
}

pub fn record_enumeration(outcome: &'static str, elapsed: Duration) {
    counter!("subenum_enumerations_total", "outcome" => outcome).increment(1);
    histogram!("subenum_enumeration_duration_seconds", "outcome" => outcome).record(elapsed.as_secs_f64());
}
