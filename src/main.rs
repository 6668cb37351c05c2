mod agent;
mod backend;
mod config;
mod glossary;
mod session;
mod spell;
mod web;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::load()?;

    let glossary = glossary::Glossary::load(&config.glossary_path)?;
    if glossary.is_empty() {
        warn!("Glossary is empty; every question will be treated as off-topic");
    }
    info!("Loaded glossary with {} term(s)", glossary.len());

    let backend = agent::create_backend(&config)?;
    let assistant = agent::Assistant::new(&config, glossary, backend);

    let sessions =
        session::SessionStore::new(&config.data_dir, config.persist_transcripts).await?;

    let server = web::Server::new(config, assistant, sessions.clone());
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, saving state...");

    if let Err(e) = sessions.flush().await {
        warn!("Failed to flush sessions on shutdown: {}", e);
    }

    server_handle.abort();
    info!("Shutdown complete");

    Ok(())
}
