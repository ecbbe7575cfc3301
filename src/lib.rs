// src/lib.rs
use anyhow::{Context, Result};
use app_state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use handlers::*;

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod docs;
mod handlers;
mod infrastructure;
mod session;

pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_memory_repository, // ---
    create_metrics,
    create_noop_metrics,
    create_postgres_repository,
    create_prom_metrics,
    create_seeded_memory_repository,
    init_database_with_retry,
};

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG` and defaults to `info`. Safe to call more than once;
/// later calls are ignored.
pub fn init_tracing() {
    // ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok(); // Ignores if already initialized
}

/// Build the HTTP router from configuration loaded from the environment.
pub async fn create_router() -> Result<Router> {
    // ---
    let config = AppConfig::from_env()?;
    build_router(config).await
}

/// Build the HTTP router from an explicit configuration.
///
/// Connects to (and migrates) PostgreSQL when that backend is selected.
///
/// # Errors
/// Returns an error if the storage backend or metrics recorder cannot be
/// initialized, or if the CORS origin is not a valid header value.
pub async fn build_router(config: AppConfig) -> Result<Router> {
    // ---
    init_tracing();

    let metrics = create_metrics(config.server.metrics)?;

    let repository = match &config.storage {
        StorageConfig::Postgres(database) => {
            let pool = init_database_with_retry(database).await?;
            create_postgres_repository(pool)
        }
        StorageConfig::Memory { seed_sample_data } => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            if *seed_sample_data {
                create_seeded_memory_repository()
            } else {
                create_memory_repository()
            }
        }
    };

    let app_state = AppState::new(metrics, repository, config.auth);

    let router = Router::new()
        .route("/api/v1", get(root_handler))
        .route("/api/v1/habits", get(list_habits).post(create_habit))
        .route(
            "/api/v1/habits/{id}",
            get(get_habit).put(update_habit).delete(delete_habit),
        )
        .route("/api/v1/users/register", post(register))
        .route("/api/v1/users/login", post(login))
        .route("/api/v1/users/logout", post(logout))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            track_http_requests,
        ))
        .merge(
            SwaggerUi::new(docs::SWAGGER_UI_PATH)
                .url(docs::OPENAPI_JSON_PATH, docs::ApiDoc::openapi()),
        )
        .fallback_service(spa_service(&config.server.client_dir))
        .layer(cors_layer(&config.server.client_url)?)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    Ok(router)
}

/// Serves the single-page client. Paths that match no file get `index.html`
/// so client-side routes survive a reload.
fn spa_service(client_dir: &Path) -> ServeDir<ServeFile> {
    // ---
    ServeDir::new(client_dir).fallback(ServeFile::new(client_dir.join("index.html")))
}

/// Allows credentialed requests (the session cookie) from the client origin.
fn cors_layer(client_url: &str) -> Result<CorsLayer> {
    // ---
    let origin = HeaderValue::from_str(client_url)
        .with_context(|| format!("Invalid HABITS_CLIENT_URL: {client_url}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]))
}
