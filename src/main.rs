//! Stockpulse service entry point

use std::sync::Arc;

use stockpulse::config::ServerConfig;
use stockpulse::server::ApiServer;
use stockpulse::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockpulse=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stockpulse...");

    let config = ServerConfig::from_env()?;
    let state = Arc::new(AppState::new(&config)?);
    tracing::info!("Application state initialized");

    let mut server = ApiServer::new(state);
    server.start(&config).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    server.stop();

    Ok(())
}
