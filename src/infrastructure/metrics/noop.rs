//! Metrics backend that discards every event.

use crate::domain::{Metrics, MetricsPtr};
use std::sync::Arc;
use std::time::Instant;

/// Selected with `HABITS_METRICS_TYPE=noop`; `/metrics` renders empty.
#[derive(Default)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    // ---
    fn render(&self) -> String {
        String::new()
    }
    fn record_habit_created(&self) {}
    fn record_user_registered(&self) {}
    fn record_login_failed(&self) {}
    fn record_http_request(&self, _: Instant, _: &str, _: &str, _: u16) {}
}

pub fn create() -> anyhow::Result<MetricsPtr> {
    // ---
    Ok(Arc::new(NoopMetrics))
}
