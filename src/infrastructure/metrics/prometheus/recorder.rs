use anyhow::{anyhow, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static HANDLE: OnceLock<Result<PrometheusHandle, String>> = OnceLock::new();

/// Install the Prometheus recorder globally and store its handle.
///
/// The recorder is process-wide; later calls reuse the outcome of the first.
pub fn init_metrics() -> Result<()> {
    HANDLE
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| e.to_string())
        })
        .as_ref()
        .map(|_| ())
        .map_err(|e| anyhow!("failed to install Prometheus recorder: {e}"))
}

/// Render the current metrics in Prometheus text format.
pub fn render_metrics() -> String {
    HANDLE
        .get()
        .and_then(|installed| installed.as_ref().ok())
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}
