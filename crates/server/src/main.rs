//! HTTP server for wholesale item recommendations.
//!
//! Loads the dataset, builds the similarity index once, then serves
//! queries until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use data_loader::DataIndex;
use server::{RecommendationEngine, ServerConfig, router};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug")),
        )
        .init();

    let config = ServerConfig::parse();
    info!(?config, "Starting wholesale recommendation server");

    // Loading and the similarity build are CPU-bound; keep them off the runtime threads
    let paths = config.dataset_paths();
    let engine = tokio::task::spawn_blocking(move || -> Result<RecommendationEngine> {
        let data_index = DataIndex::load_from_paths(&paths)
            .context("Failed to load wholesale dataset")?;
        Ok(RecommendationEngine::build(Arc::new(data_index)))
    })
    .await
    .context("Startup build task panicked")??;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!(bind = %config.bind, "Listening");

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "Failed to listen for shutdown signal");
        // Without a signal handler there is nothing to wait for
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
