//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_agent_epochs_started_total` (counter): proxy processes spawned
//! - `proxy_agent_epoch_outcomes_total` (counter): finished runs by outcome
//! - `proxy_agent_proxy_live` (gauge): 1=live, 0=not live, per last probe
//! - `proxy_agent_cleanup_failures_total` (counter): bootstrap files left behind
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter serves its own HTTP listener

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_epoch_started() {
    ::metrics::counter!("proxy_agent_epochs_started_total").increment(1);
}

pub fn record_epoch_outcome(outcome: &'static str) {
    ::metrics::counter!("proxy_agent_epoch_outcomes_total", "outcome" => outcome).increment(1);
}

pub fn record_proxy_live(live: bool) {
    ::metrics::gauge!("proxy_agent_proxy_live").set(if live { 1.0 } else { 0.0 });
}

pub fn record_cleanup_failure() {
    ::metrics::counter!("proxy_agent_cleanup_failures_total").increment(1);
}
