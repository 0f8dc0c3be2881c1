//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tube_jobs_dispatched_total` (counter): jobs admitted, by tube
//! - `tube_jobs_completed_total` (counter): finished jobs, by tube and outcome
//! - `tube_jobs_in_flight` (gauge): permits currently held, by tube
//! - `tube_dispatch_wait_seconds` (histogram): time spent waiting for a permit
//!
//! Jobs whose handler panics are visible as dispatched but never completed.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_dispatched(tube: &str, waited: Duration) {
    counter!("tube_jobs_dispatched_total", "tube" => tube.to_string()).increment(1);
    histogram!("tube_dispatch_wait_seconds", "tube" => tube.to_string()).record(waited.as_secs_f64());
}

pub fn record_completed(tube: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    counter!("tube_jobs_completed_total", "tube" => tube.to_string(), "outcome" => outcome).increment(1);
}

pub fn in_flight_inc(tube: &str) {
    gauge!("tube_jobs_in_flight", "tube" => tube.to_string()).increment(1.0);
}

pub fn in_flight_dec(tube: &str) {
    gauge!("tube_jobs_in_flight", "tube" => tube.to_string()).decrement(1.0);
}
