//! Tracing subscriber setup.

use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::error::AppError;

const SERVICE_NAME: &str = "whisper-core";

/// Installs the global subscriber.
///
/// `RUST_LOG` drives the filter (default `info`). With `json` set, records are
/// emitted as bunyan JSON lines on stdout; otherwise the pretty formatter is used.
pub fn init_tracing(json: bool) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let subscriber = Registry::default()
            .with(filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(SERVICE_NAME.to_string(), std::io::stdout));
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| AppError::Internal(format!("Failed to install JSON subscriber: {}", e)))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| AppError::Internal(format!("Failed to install subscriber: {}", e)))
    }
}
