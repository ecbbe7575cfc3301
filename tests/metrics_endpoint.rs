use habits_api::MetricsKind;
use serde_json::json;
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

mod common;

use common::{test_config, TestServer};

// NOTE: The Prometheus recorder is process-global.
// Tests are serial so counters from one test are not mid-flight in another.

async fn prom_server() -> TestServer {
    // ---
    let mut config = test_config();
    config.server.metrics = MetricsKind::Prometheus;
    TestServer::with_config(config).await
}

#[tokio::test]
#[serial]
async fn metrics_endpoint_with_prometheus() {
    // ---
    let server = prom_server().await;

    // First, hit some endpoints to generate metrics
    let cookie = server.session_cookie().await;
    server
        .create_habit(&cookie, json!({ "name": "Floss", "category": "Health" }))
        .await;
    server.login("habit_tester", "wrong password").await;
    server.list_habits("").await;

    // Give metrics a moment to be recorded
    sleep(Duration::from_millis(50)).await;

    let res = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();

    assert!(
        res.status().is_success(),
        "Metrics endpoint should return success"
    );

    let body = res.text().await.unwrap();

    for name in [
        "habits_created_total",
        "users_registered_total",
        "logins_failed_total",
        "http_request_duration_seconds",
    ] {
        assert!(body.contains(name), "missing {name} in:\n{body}");
    }

    // Routes are labelled by template, not by raw URI
    assert!(body.contains(r#"path="/api/v1/habits""#), "{body}");
}

#[tokio::test]
#[serial]
async fn metrics_endpoint_with_noop() {
    // ---
    let server = TestServer::new().await;

    let _ = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();

    let res = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();

    // Should still return success even with noop metrics
    assert!(
        res.status().is_success(),
        "Metrics endpoint should return success even with noop"
    );
    assert!(res.text().await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn metrics_endpoint_survives_load() {
    // ---
    let server = Arc::new(prom_server().await);

    // Generate some load
    let futures = (0..20).map(|i| {
        let server = Arc::clone(&server);
        async move {
            let endpoint = match i % 3 {
                0 => "/health",
                1 => "/api/v1/habits",
                _ => "/metrics",
            };
            server.client.get(server.url(endpoint)).send().await
        }
    });

    let responses = futures::future::join_all(futures).await;

    // All requests should succeed
    for (i, response) in responses.into_iter().enumerate() {
        // ---
        let response = response.unwrap_or_else(|_| panic!("Request {i} should succeed"));
        assert!(
            response.status().is_success(),
            "Request {i} should return success"
        );
    }

    let res = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    assert!(!res.text().await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn metrics_content_type_is_correct() {
    // ---
    let server = prom_server().await;

    let res = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    let content_type = res
        .headers()
        .get("content-type")
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or_default();

    assert!(
        content_type.starts_with("text/plain"),
        "Content type should be Prometheus text format: {content_type}"
    );
}
