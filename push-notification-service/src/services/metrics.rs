//! Prometheus metrics for the push notification service.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Subsequent calls are no-ops.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    METRICS_HANDLE.set(handle).ok();
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count one dispatch attempt by outcome (`sent`, `rejected`, `failed`).
pub fn record_dispatch(provider: &'static str, outcome: &'static str) {
    metrics::counter!(
        "push_notifications_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
}
