// Test helpers are intentionally partially used
#![allow(dead_code)]

use habits_api::{build_router, AppConfig, AuthConfig, MetricsKind, ServerConfig, StorageConfig};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

// ============================================================================
// Test Setup
// ============================================================================

/// Configuration for a self-contained server: in-memory storage, no-op
/// metrics, cheap bcrypt, and a client directory that does not exist.
pub fn test_config() -> AppConfig {
    // ---
    AppConfig {
        server: ServerConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            client_url: "http://localhost:4200".to_string(),
            client_dir: PathBuf::from("target/no-such-client-dir"),
            metrics: MetricsKind::Noop,
        },
        storage: StorageConfig::Memory {
            seed_sample_data: false,
        },
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            token_ttl: Duration::from_secs(3600),
            bcrypt_cost: 4,
        },
    }
}

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    pub async fn new() -> Self {
        // ---
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        // --

        // Enable debug logging only when requested
        if std::env::var("TEST_DEBUG").is_ok() {
            std::env::set_var("RUST_LOG", "debug");
            std::env::set_var("NO_COLOR", "1");
        }

        let app = build_router(config)
            .await
            .expect("Should be able to create router");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(100)).await;

        let client = Client::new();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn register(&self, username: &str, password: &str) -> Response {
        // ---
        self.client
            .post(self.url("/api/v1/users/register"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to send register request")
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        // ---
        self.client
            .post(self.url("/api/v1/users/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to send login request")
    }

    /// Registers a fresh account, logs in, and returns the `token=...`
    /// cookie pair to send on protected requests.
    pub async fn session_cookie(&self) -> String {
        // ---
        let (username, password) = ("habit_tester", "correct horse battery");

        let response = self.register(username, password).await;
        assert_eq!(response.status(), 201, "registration should succeed");

        let response = self.login(username, password).await;
        assert_eq!(response.status(), 200, "login should succeed");

        cookie_pair(&response).expect("login should set the session cookie")
    }

    // ========================================================================
    // Habits
    // ========================================================================

    pub async fn create_habit(&self, cookie: &str, body: Value) -> Response {
        // ---
        self.client
            .post(self.url("/api/v1/habits"))
            .header(COOKIE, cookie)
            .json(&body)
            .send()
            .await
            .expect("Failed to send create request")
    }

    pub async fn list_habits(&self, query: &str) -> Vec<Value> {
        // ---
        let response = self
            .client
            .get(self.url(&format!("/api/v1/habits{query}")))
            .send()
            .await
            .expect("Failed to list habits");

        assert_eq!(response.status(), 200);
        response.json().await.expect("List should return a JSON array")
    }

    /// Creates a habit and returns its generated id, read from `Location`.
    pub async fn create_habit_id(&self, cookie: &str, body: Value) -> String {
        // ---
        let response = self.create_habit(cookie, body).await;
        assert_eq!(response.status(), 201);

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .expect("Created habit should have a Location header")
            .to_str()
            .unwrap()
            .to_string();

        location
            .rsplit('/')
            .next()
            .expect("Location should end with the id")
            .to_string()
    }
}

/// Extracts the `name=value` part of the response's `Set-Cookie` header.
pub fn cookie_pair(response: &Response) -> Option<String> {
    // ---
    response
        .headers()
        .get(SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(|pair| pair.trim().to_string())
}
