//! Prometheus metrics implementation.
//!
//! Concrete implementation of the `Metrics` trait. It delegates to utility
//! functions in sibling modules (`counters.rs`, `recorder.rs`) which handle
//! the actual collection via the global `metrics` crate registry.

use crate::domain::Metrics;
use std::time::Instant;

/// Prometheus-based metrics implementation.
///
/// Empty because metrics are registered globally using macros like
/// `counter!()` and `histogram!()`; the handle stored in `recorder.rs`
/// renders them.
#[derive(Default)]
pub struct PrometheusMetrics {}

impl PrometheusMetrics {
    pub fn new() -> Self {
        tracing::info!("Creating Prometheus metrics");
        PrometheusMetrics {}
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> String {
        super::render_metrics()
    }

    fn record_habit_created(&self) {
        tracing::debug!("Recording habit created event");
        super::increment_habit_created();
    }

    fn record_user_registered(&self) {
        tracing::debug!("Recording user registered event");
        super::increment_user_registered();
    }

    fn record_login_failed(&self) {
        super::increment_login_failed();
    }

    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16) {
        super::track_http_request(start, path, method, status);
    }
}
