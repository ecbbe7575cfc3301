//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` contains shared
//! resources like the repository, metrics implementation, and the auth
//! settings needed to issue and verify session tokens.
//!
//! The state is cheaply cloneable (using `Arc` internally) so it can be
//! passed to each request handler without copying resources.

use crate::config::AuthConfig;
use crate::domain::{MetricsPtr, RepositoryPtr};
use crate::infrastructure::password;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Plaintext behind the hash checked when a login names an unknown user.
const DUMMY_PASSWORD: &str = "no-such-user-placeholder";

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the application.
/// Handlers depend on the `Repository` and `Metrics` abstractions, not on the
/// concrete PostgreSQL, in-memory, or Prometheus implementations.
///
/// # Lifecycle
///
/// 1. Created once in `build_router()` during application startup
/// 2. Attached to the Axum router via `.with_state(app_state)`
/// 3. Cloned automatically by Axum for each incoming HTTP request
/// 4. Handlers extract via `State(state): State<AppState>`
#[derive(Clone)]
pub(crate) struct AppState {
    /// Metrics implementation for recording application events.
    metrics: MetricsPtr,

    /// Repository abstraction for habits and users.
    repository: RepositoryPtr,

    /// Token signing secret, token lifetime, and bcrypt cost.
    auth: Arc<AuthConfig>,

    /// bcrypt hash at the configured cost, computed on first use.
    dummy_hash: Arc<OnceCell<String>>,
}

impl AppState {
    // ---

    pub fn new(metrics: MetricsPtr, repository: RepositoryPtr, auth: AuthConfig) -> Self {
        // ---
        AppState {
            metrics,
            repository,
            auth: Arc::new(auth),
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the repository implementation.
    pub(crate) fn repository(&self) -> &RepositoryPtr {
        // ---
        &self.repository
    }

    /// Secret used to sign and verify session tokens.
    pub(crate) fn jwt_secret(&self) -> &str {
        // ---
        &self.auth.jwt_secret
    }

    /// Lifetime of issued session tokens and their cookie.
    pub(crate) fn token_ttl(&self) -> Duration {
        // ---
        self.auth.token_ttl
    }

    /// bcrypt work factor for new password hashes.
    pub(crate) fn bcrypt_cost(&self) -> u32 {
        // ---
        self.auth.bcrypt_cost
    }

    /// Hash verified against when a login names an unknown user, so that
    /// path costs the same bcrypt work as a real password check.
    pub(crate) async fn dummy_password_hash(&self) -> anyhow::Result<&str> {
        // ---
        self.dummy_hash
            .get_or_try_init(|| password::hash_password(DUMMY_PASSWORD.to_string(), self.auth.bcrypt_cost))
            .await
            .map(String::as_str)
    }
}
