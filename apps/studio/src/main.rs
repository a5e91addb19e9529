mod config;
use config::StudioConfig;

use atelier_core::generator::{LocalGenerator, OpenAiBackend};
use atelier_core::store::{FileSlot, ProjectStore};
use atelier_core::ApiServer;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Logging / tracing
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,atelier_core=info,studio=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    // Load configuration (defaults + env + optional TOML overlay)
    let cfg = StudioConfig::load();
    info!(
        target = "studio",
        data_dir = %cfg.data_dir.display(),
        addr = %format!("{}:{}", cfg.api.host, cfg.api.port),
        "Starting studio admin server"
    );

    // Project collection persisted as one JSON slot under the data dir
    let slot = Arc::new(FileSlot::new(&cfg.data_dir)?);
    let store = Arc::new(ProjectStore::new(slot));

    // In-process generation pipeline: prompt → OpenAI-compatible backend →
    // strict JSON extraction
    let backend = Arc::new(OpenAiBackend::new(cfg.backend.clone())?);
    let generator = Arc::new(LocalGenerator::new(backend));

    let server = ApiServer::new(cfg.api.clone(), store, generator);
    server.serve().await?;

    Ok(())
}
