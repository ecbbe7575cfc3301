//! Repository backends and database startup.

mod memory_repository;
mod postgres_repository;


use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

pub use memory_repository::{create_memory_repository, create_seeded_memory_repository};
pub use postgres_repository::create_postgres_repository;

/// Delay between failed connection attempts at startup.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Connects to PostgreSQL and applies pending migrations.
///
/// The initial connection is attempted up to `retry_count` times so the
/// service can start alongside a database container that is still booting.
///
/// # Errors
/// Returns an error if every attempt fails or a migration cannot be applied.
pub async fn init_database_with_retry(config: &DatabaseConfig) -> Result<PgPool> {
    // ---
    let options = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout);

    let attempts = config.retry_count.max(1);
    let mut attempt = 0;

    let pool = loop {
        attempt += 1;
        match options.clone().connect(&config.database_url).await {
            Ok(pool) => break pool,
            Err(err) if attempt < attempts => {
                tracing::warn!(
                    "Database connection attempt {}/{} failed: {}",
                    attempt,
                    attempts,
                    err
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(err) => {
                return Err(err).context(format!(
                    "Failed to connect to database after {attempts} attempts"
                ));
            }
        }
    };

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database ready after {} attempt(s)", attempt);

    Ok(pool)
}
