//! Fallback resolver: the terminal safety net for content selection.
//!
//! The fallback file is JSON holding either a list of whispers or a single
//! whisper. It is read on first use and cached once a read succeeds; until
//! then every call retries and, on failure, serves [`default_whisper`].

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::content::Whisper;
use crate::error::AppError;

const DEFAULT_MIRROR: &str = "You came here carrying something you have not said out loud.";
const DEFAULT_WHISPER_START: &str = "The answer you are waiting for is already on its way to you...";
const DEFAULT_BLURRED_REVEAL: &str =
    "What feels stuck right now is only waiting for your permission to change.";
const DEFAULT_ENCOURAGEMENT: &str = "Breathe. You were heard, and you are not walking this alone.";

/// Last-resort whisper used when the fallback source cannot be read.
pub fn default_whisper() -> Whisper {
    Whisper::new(
        DEFAULT_MIRROR,
        DEFAULT_WHISPER_START,
        DEFAULT_BLURRED_REVEAL,
        DEFAULT_ENCOURAGEMENT,
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FallbackContent {
    Many(Vec<Whisper>),
    One(Whisper),
}

#[derive(Debug, Default)]
pub struct FallbackResolver {
    source: Option<PathBuf>,
    cache: OnceLock<Vec<Whisper>>,
}

impl FallbackResolver {
    /// Resolver backed by a fallback file, read lazily.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(path.into()),
            cache: OnceLock::new(),
        }
    }

    /// Resolver with an already-loaded fallback set.
    ///
    /// An empty set behaves like an unreadable source.
    pub fn with_whispers(whispers: Vec<Whisper>) -> Self {
        let cache = OnceLock::new();
        if !whispers.is_empty() {
            let _ = cache.set(whispers);
        }
        Self {
            source: None,
            cache,
        }
    }

    /// Resolver that always serves the hard-coded default.
    pub fn literal_only() -> Self {
        Self::default()
    }

    /// Returns a fallback whisper. Never fails.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Whisper {
        match self.whispers() {
            Some(whispers) => whispers
                .choose(rng)
                .cloned()
                .unwrap_or_else(default_whisper),
            None => default_whisper(),
        }
    }

    /// Whether the source has been read successfully.
    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    fn whispers(&self) -> Option<&[Whisper]> {
        if let Some(cached) = self.cache.get() {
            return Some(cached);
        }

        let path = self.source.as_ref()?;
        match load_fallback_file(path) {
            Ok(whispers) => {
                debug!(count = whispers.len(), "Fallback whispers cached");
                // A concurrent loader may have won the race; either copy is equivalent.
                let _ = self.cache.set(whispers);
                self.cache.get().map(Vec::as_slice)
            }
            Err(e) => {
                warn!(error = %e, "Fallback source unavailable, serving the default whisper");
                None
            }
        }
    }
}

fn load_fallback_file(path: &Path) -> Result<Vec<Whisper>, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::ContentSource(format!("{}: {}", path.display(), e)))?;

    let whispers = match serde_json::from_str::<FallbackContent>(raw.trim())
        .map_err(|e| AppError::ContentSource(format!("{}: {}", path.display(), e)))?
    {
        FallbackContent::Many(whispers) => whispers,
        FallbackContent::One(whisper) => vec![whisper],
    };

    if whispers.is_empty() {
        return Err(AppError::ContentSource(format!(
            "{}: no fallback whispers",
            path.display()
        )));
    }
    Ok(whispers)
}
