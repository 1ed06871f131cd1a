//! Selector output, serialized as the JSON body of `GET /api/get-whisper`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::content::Whisper;

/// Category reported when no category matched.
pub const FALLBACK_CATEGORY: &str = "fallback";
pub const GIBBERISH_CATEGORY: &str = "fallback_gibberish";
pub const OFFENSIVE_CATEGORY: &str = "fallback_offensive";

/// Why a fallback whisper was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    GibberishDetected,
    OffensiveContent,
    NoWhispersInCategory,
    NoCategoryMatch,
}

impl FallbackReason {
    pub fn label(&self) -> &'static str {
        match self {
            FallbackReason::GibberishDetected => "gibberish_detected",
            FallbackReason::OffensiveContent => "offensive_content",
            FallbackReason::NoWhispersInCategory => "no_whispers_in_category",
            FallbackReason::NoCategoryMatch => "no_category_match",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhisperResponse {
    /// Normalized input.
    pub input: String,
    /// Matched category, or one of the `fallback*` categories.
    pub category: String,
    pub whisper: Whisper,
    /// Present only when the fallback path was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
}

impl WhisperResponse {
    pub fn matched(input: String, category: String, whisper: Whisper) -> Self {
        Self {
            input,
            category,
            whisper,
            fallback_reason: None,
        }
    }

    pub fn fallback(input: String, category: String, whisper: Whisper, reason: FallbackReason) -> Self {
        Self {
            input,
            category,
            whisper,
            fallback_reason: Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}
