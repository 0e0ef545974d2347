//! product-reporter - top selling products over HTTP
//!
//! Read-only view of the product store written by `order-scraper`:
//! - `GET /top-products?count=N`
//! - `GET /health`

mod api;
mod config;
mod state;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    shared::init_logger(env!("CARGO_PKG_NAME"), &config.log_level, config.log_dir.as_deref());

    tracing::info!("Starting product-reporter v{}", env!("CARGO_PKG_VERSION"));

    // Store connection (bounded retry, then give up)
    let state = AppState::connect(&config).await?;
    let app = api::create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("product-reporter HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("product-reporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
