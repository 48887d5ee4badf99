use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use tracing::warn;

/// Installs the Prometheus recorder. Returns `None` if a recorder is already
/// installed for this process; the service keeps running without metrics.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            // Initialize metrics with zero values
            for outcome in ["success", "bad_request", "internal_server_error"] {
                counter!("domaininfo_requests_total", "outcome" => outcome).absolute(0);
            }
            counter!("domaininfo_serialization_failures_total").absolute(0);
            Some(handle)
        }
        Err(e) => {
            warn!("Failed to install metrics recorder: {}", e);
            None
        }
    }
}

pub fn increment_requests(outcome: &'static str) {
    counter!("domaininfo_requests_total", "outcome" => outcome).increment(1);
}

pub fn increment_serialization_failures() {
    counter!("domaininfo_serialization_failures_total").increment(1);
}

pub fn record_lookup_time(elapsed: Duration) {
    histogram!("domaininfo_lookup_duration_seconds").record(elapsed.as_secs_f64());
}
