// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. Appropriate for non-critical tuning parameters
/// where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

/// Reads an optional string environment variable with a default.
macro_rules! optional_env {
    // ---
    ($key:literal, $default:expr) => {
        std::env::var($key).unwrap_or_else(|_| $default.to_string())
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: server::ServerConfig,
    pub storage: storage::StorageConfig,
    pub auth: auth::AuthConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            server: server::ServerConfig::from_env()?,
            storage: storage::StorageConfig::from_env()?,
            auth: auth::AuthConfig::from_env()?,
        })
    }
}

// ============================================================
// Server configuration
// ============================================================

mod server {
    // ---
    use super::*;
    use std::path::PathBuf;

    /// Which metrics backend records application events.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MetricsKind {
        Prometheus,
        Noop,
    }

    /// HTTP surface configuration.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Socket address to listen on. Defaults to `127.0.0.1:3000`.
        pub bind_addr: String,

        /// Origin allowed to make credentialed cross-origin requests.
        pub client_url: String,

        /// Directory holding the single-page client served for unmatched routes.
        pub client_dir: PathBuf,

        /// Metrics backend. `prom` selects Prometheus, anything else is no-op.
        pub metrics: MetricsKind,
    }

    impl ServerConfig {
        /// Builds a [`ServerConfig`] from environment variables.
        ///
        /// Every setting has a default.
        pub fn from_env() -> Result<Self> {
            // ---
            let bind_addr = optional_env!("HABITS_BIND_ADDR", "127.0.0.1:3000");
            let client_url = optional_env!("HABITS_CLIENT_URL", "http://localhost:4200");
            let client_dir = PathBuf::from(optional_env!("HABITS_CLIENT_DIR", "public"));

            let metrics = match optional_env!("HABITS_METRICS_TYPE", "noop").as_str() {
                "prom" => MetricsKind::Prometheus,
                _ => MetricsKind::Noop,
            };

            Ok(Self {
                bind_addr,
                client_url,
                client_dir,
                metrics,
            })
        }
    }
}
pub use server::{MetricsKind, ServerConfig};

// ============================================================
// Storage configuration
// ============================================================

mod storage {
    // ---
    use super::*;

    /// Where habits and users are persisted.
    #[derive(Debug, Clone)]
    pub enum StorageConfig {
        /// PostgreSQL via a connection pool.
        Postgres(DatabaseConfig),

        /// Process-local storage, lost on exit.
        Memory {
            /// Pre-populate the store with sample habits.
            seed_sample_data: bool,
        },
    }

    impl StorageConfig {
        /// Builds a [`StorageConfig`] from `HABITS_STORAGE` (default `postgres`).
        ///
        /// # Errors
        /// Returns an error for an unknown backend name, or if the PostgreSQL
        /// backend is selected without a `DATABASE_URL`.
        pub fn from_env() -> Result<Self> {
            // ---
            match optional_env!("HABITS_STORAGE", "postgres").as_str() {
                "postgres" => Ok(Self::Postgres(DatabaseConfig::from_env()?)),
                "memory" => Ok(Self::Memory {
                    seed_sample_data: optional_env_parse!("HABITS_SEED_SAMPLE_DATA", bool, false),
                }),
                other => Err(anyhow::anyhow!(
                    "Invalid HABITS_STORAGE value '{other}' (expected 'postgres' or 'memory')"
                )),
            }
        }
    }

    /// Database-related configuration derived from environment variables.
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// PostgreSQL connection string.
        pub database_url: String,

        /// Number of connection attempts at startup. Defaults to 50.
        pub retry_count: u32,

        /// Maximum time to wait when acquiring a connection from the pool. Defaults to 30 seconds.
        pub acquire_timeout: Duration,

        /// Minimum number of connections to keep in the pool, even when idle. Defaults to 2.
        pub min_connections: u32,

        /// Maximum number of connections open concurrently. Defaults to 15.
        pub max_connections: u32,
    }

    impl DatabaseConfig {
        /// Builds a [`DatabaseConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `DATABASE_URL` is missing.
        pub fn from_env() -> Result<Self> {
            // ---
            let database_url = required_env!("DATABASE_URL");
            let retry_count = optional_env_parse!("HABITS_DB_RETRY_COUNT", u32, 50);
            let acquire_timeout_secs = optional_env_parse!("HABITS_DB_ACQUIRE_TIMEOUT_SEC", u64, 30);
            let min_connections = optional_env_parse!("HABITS_DB_MIN_CONNECTIONS", u32, 2);
            let max_connections = optional_env_parse!("HABITS_DB_MAX_CONNECTIONS", u32, 15);

            Ok(Self {
                database_url,
                retry_count,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                min_connections,
                max_connections,
            })
        }
    }
}
pub use storage::{DatabaseConfig, StorageConfig};

// ============================================================
// Auth configuration
// ============================================================

mod auth {
    // ---
    use super::*;

    /// Token signing and password hashing configuration.
    #[derive(Clone)]
    pub struct AuthConfig {
        /// HMAC secret used to sign and verify session tokens.
        pub jwt_secret: String,

        /// Lifetime of an issued token and of the cookie carrying it. Defaults to 1 hour.
        pub token_ttl: Duration,

        /// bcrypt work factor. Defaults to 12.
        pub bcrypt_cost: u32,
    }

    impl std::fmt::Debug for AuthConfig {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            // ---
            f.debug_struct("AuthConfig")
                .field("jwt_secret", &"<redacted>")
                .field("token_ttl", &self.token_ttl)
                .field("bcrypt_cost", &self.bcrypt_cost)
                .finish()
        }
    }

    impl AuthConfig {
        /// Builds an [`AuthConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if the signing secret is missing or empty.
        pub fn from_env() -> Result<Self> {
            // ---
            let jwt_secret = required_env!("HABITS_JWT_SECRET");
            if jwt_secret.is_empty() {
                anyhow::bail!("HABITS_JWT_SECRET must not be empty");
            }

            let ttl_secs = optional_env_parse!("HABITS_TOKEN_TTL_SEC", u64, 3600);
            let bcrypt_cost = optional_env_parse!("HABITS_BCRYPT_COST", u32, 12);

            Ok(Self {
                jwt_secret,
                token_ttl: Duration::from_secs(ttl_secs),
                bcrypt_cost,
            })
        }
    }
}
pub use auth::AuthConfig;

// ============================================================
// Tests
// ============================================================
