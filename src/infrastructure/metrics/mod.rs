mod noop;
mod prometheus;

use crate::config::MetricsKind;
use crate::domain::MetricsPtr;

pub use noop::create as create_noop_metrics;
pub use prometheus::create as create_prom_metrics;

/// Builds the metrics backend chosen by `HABITS_METRICS_TYPE`.
pub fn create_metrics(kind: MetricsKind) -> anyhow::Result<MetricsPtr> {
    // ---
    match kind {
        MetricsKind::Prometheus => create_prom_metrics(),
        MetricsKind::Noop => create_noop_metrics(),
    }
}
