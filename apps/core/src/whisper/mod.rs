//! # Whisper Module
//!
//! Picks the whisper served for a piece of free text.
//!
//! ## Components
//! - `normalizer`: input validation and normalization
//! - `filters`: gibberish and offensive pre-filters
//! - `matcher`: keyword scoring and tier-aware ranking
//! - `picker`: uniform pick from a category pool
//! - `fallback`: fallback source with a hard-coded last resort
//! - `content`: alias, pool and tier tables
//! - `response`: output data structure
//! - `selector`: main orchestrator

pub mod content;
pub mod fallback;
pub mod filters;
pub mod matcher;
pub mod normalizer;
pub mod picker;
pub mod response;
pub mod selector;

pub use content::{AliasTable, CategoryTierTable, ContentReport, ContentStore, MessagePool, Whisper};
pub use fallback::FallbackResolver;
pub use matcher::{CategoryMatcher, MatchCandidate, SCORING_VERSION};
pub use response::{FallbackReason, WhisperResponse};
pub use selector::WhisperSelector;
