mod database;
mod metrics;
pub mod password;

// Re-export the factory functions for easy access
pub use database::{
    create_memory_repository, create_postgres_repository, create_seeded_memory_repository,
    init_database_with_retry,
};
pub use metrics::{create_metrics, create_noop_metrics, create_prom_metrics};
