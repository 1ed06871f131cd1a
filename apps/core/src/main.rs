// Whisper service entry point
// Loads the content tables once, then serves GET /api/get-whisper.

use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use whisper_core::api::{self, AppState};
use whisper_core::config::ServerConfig;
use whisper_core::telemetry;
use whisper_core::whisper::{ContentStore, WhisperSelector};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = ServerConfig::from_env()?;
    telemetry::init_tracing(config.log_json)?;

    let paths = config.content_paths();
    info!(data_dir = ?config.data_dir, "Loading whisper content");
    let store = ContentStore::load(&paths)
        .with_context(|| format!("loading whisper content from {:?}", config.data_dir))?;

    let app = api::router(AppState::new(WhisperSelector::new(Arc::new(store))));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Whisper service listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
