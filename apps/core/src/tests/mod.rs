//! Test Module
//!
//! Crate-level test suite for the whisper service.
//!
//! ## Test Categories
//! - `selector_tests`: end-to-end selection properties over real and synthetic content
//! - `content_tests`: loading the data directory, tier overrides, fallback wiring
//! - `api_tests`: HTTP routes, status codes and JSON shapes

pub mod content_tests;

use crate::fs_manager::ContentPaths;
use std::path::PathBuf;

/// Data directory shipped with the crate.
pub fn shipped_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

pub fn shipped_paths() -> ContentPaths {
    ContentPaths::in_dir(&shipped_data_dir())
}
