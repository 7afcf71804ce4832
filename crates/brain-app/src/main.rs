//! Brain service binary - composition root.
//!
//! 1. Parse CLI flags and load configuration (file, then env, then flags)
//! 2. Initialize tracing
//! 3. Load the embedding model once; a failure leaves the service degraded
//! 4. Record which chat providers have credentials
//! 5. Start the axum HTTP server

mod cli;
mod startup;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use brain_api::routes;
use brain_api::state::AppState;
use brain_chat::{ChatRouter, ProviderCredentials};
use brain_vector::EmbeddingEngine;

use cli::CliArgs;
use startup::LoadedConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. Problems are reported once tracing is up.
    let loaded = LoadedConfig::resolve(&args, |key| std::env::var(key).ok());

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&loaded.config.general.log_level)),
        )
        .init();

    tracing::info!("Starting brain service v{}", env!("CARGO_PKG_VERSION"));
    loaded.report();

    let config = loaded.config;
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    // Embedding model. A failed load is logged inside the engine and
    // reported through /health; the server still starts.
    let engine = EmbeddingEngine::from_config(&config.embedding);
    if !engine.is_loaded() {
        tracing::warn!(
            state = engine.state().name(),
            "Embedding endpoints will answer 503 until the service is restarted with a model"
        );
    }

    // Chat providers.
    let credentials = ProviderCredentials::from_env();
    for entry in credentials.entries() {
        tracing::info!(
            provider = %entry.provider,
            credential_present = entry.credential_present,
            "Chat provider"
        );
    }

    let state = AppState::new(config.clone(), engine, ChatRouter::new(credentials));

    if let Err(e) = routes::start_server(&config, state).await {
        tracing::error!(error = %e, "Server stopped");
        return Err(e.into());
    }

    Ok(())
}
