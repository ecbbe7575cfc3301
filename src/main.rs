use anyhow::Result;
use habits_api::{build_router, init_tracing, AppConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    // A missing .env file is fine; real deployments set the environment directly.
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let endpoint = config.server.bind_addr.clone();

    let app = build_router(config).await?;

    info!("Starting at endpoint:{}", endpoint);
    info!("Starting Habits API server v{}...", env!("CARGO_PKG_VERSION"));

    let listener = TcpListener::bind(&endpoint).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    // ---
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
