use metrics::{counter, histogram};
use std::time::Instant;

/// Increment a counter for created habits.
pub fn increment_habit_created() {
    counter!("habits_created_total").increment(1);
}

/// Increment a counter for registered users.
pub fn increment_user_registered() {
    counter!("users_registered_total").increment(1);
}

/// Increment a counter for rejected logins.
pub fn increment_login_failed() {
    counter!("logins_failed_total").increment(1);
}

/// Track HTTP request latency using a histogram labelled by route and status.
pub fn track_http_request(start: Instant, path: &str, method: &str, status: u16) {
    let elapsed = start.elapsed();
    histogram!(
        "http_request_duration_seconds",
        "path" => path.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(elapsed);
}
