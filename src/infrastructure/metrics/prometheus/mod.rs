mod counters;
mod prometheus_metrics;
mod recorder;

pub use prometheus_metrics::PrometheusMetrics;
use std::sync::Arc;

// Re-export utilities for internal use within this module
pub(crate) use counters::{
    increment_habit_created, increment_login_failed, increment_user_registered,
    track_http_request,
};
pub(crate) use recorder::{init_metrics, render_metrics};

/// Creates a new Prometheus metrics implementation.
///
/// Installs the global recorder on first use and returns a handle that
/// records into it and renders it for the `/metrics` endpoint.
pub fn create() -> anyhow::Result<crate::domain::MetricsPtr> {
    tracing::info!("Initializing Prometheus metrics");
    init_metrics()?;

    Ok(Arc::new(PrometheusMetrics::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_returns_valid_metrics() {
        let result = create();
        assert!(result.is_ok());
    }

    #[test]
    fn test_create_twice_reuses_recorder() {
        let first = create().unwrap();
        let second = create().unwrap();

        first.record_habit_created();
        second.record_habit_created();

        assert!(second.render().contains("habits_created_total"));
    }
}
