use crate::app_state::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;

/// Handler for the `/metrics` endpoint.
///
/// Returns metrics in Prometheus text format for scraping.
/// Uses the metrics implementation from AppState, which could be
/// either Prometheus or no-op depending on configuration.
pub async fn metrics_handler(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    // ---

    let metrics_text = app_state.metrics().render();

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics_text,
    ))
}

/// Middleware recording the duration and outcome of every routed request.
///
/// Requests are labelled by route template (e.g. `/api/v1/habits/{id}`)
/// rather than the raw URI, keeping label cardinality bounded.
pub async fn track_http_requests(
    State(app_state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    // ---
    let start = Instant::now();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let method = req.method().to_string();

    let response = next.run(req).await;

    app_state
        .metrics()
        .record_http_request(start, &path, &method, response.status().as_u16());

    response
}
