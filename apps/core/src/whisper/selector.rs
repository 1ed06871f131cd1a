//! Whisper Selector - orchestrates one selection.
//!
//! 1. Normalize the input (the only step that can fail).
//! 2. Screen it: gibberish, then offensive.
//! 3. Score categories and take the best candidate.
//! 4. Pick a whisper from that category's pool.
//!
//! Steps 2 to 4 fall back to the [`FallbackResolver`](super::fallback::FallbackResolver)
//! instead of failing, so valid input always gets a whisper.

use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::content::ContentStore;
use super::filters::{self, FilterVerdict};
use super::matcher::CategoryMatcher;
use super::normalizer::normalize;
use super::picker::pick_whisper;
use super::response::{
    FallbackReason, WhisperResponse, FALLBACK_CATEGORY, GIBBERISH_CATEGORY, OFFENSIVE_CATEGORY,
};
use crate::context::RequestContext;
use crate::error::AppError;

/// Stateless selector over shared, immutable content.
#[derive(Debug, Clone)]
pub struct WhisperSelector {
    store: Arc<ContentStore>,
}

impl WhisperSelector {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Selects a whisper for raw user input.
    ///
    /// Only [`AppError::InvalidInput`] is ever returned; every other problem
    /// is absorbed into a fallback response.
    #[instrument(skip_all, fields(request_id = %ctx.request_id))]
    pub fn select<R: Rng + ?Sized>(
        &self,
        ctx: &RequestContext,
        raw: Option<&str>,
        rng: &mut R,
    ) -> Result<WhisperResponse, AppError> {
        let input = normalize(raw)?;

        if let Some(verdict) = filters::screen(&input) {
            let (reason, category) = match verdict {
                FilterVerdict::Gibberish => (FallbackReason::GibberishDetected, GIBBERISH_CATEGORY),
                FilterVerdict::Offensive => (FallbackReason::OffensiveContent, OFFENSIVE_CATEGORY),
            };
            return Ok(self.fallback(ctx, input, category.to_string(), reason, rng));
        }

        let matcher = CategoryMatcher::new(&self.store.aliases, &self.store.tiers);
        let candidates = matcher.ranked(&input);
        let Some(best) = candidates.first() else {
            return Ok(self.fallback(
                ctx,
                input,
                FALLBACK_CATEGORY.to_string(),
                FallbackReason::NoCategoryMatch,
                rng,
            ));
        };

        debug!(
            category = %best.category,
            score = best.score,
            tier = best.tier,
            candidates = candidates.len(),
            "Category selected"
        );

        match pick_whisper(&self.store.pool, &best.category, rng) {
            Some(whisper) => {
                info!(category = %best.category, elapsed_us = ctx.elapsed().as_micros() as u64, "Whisper selected");
                Ok(WhisperResponse::matched(input, best.category.clone(), whisper))
            }
            None => Ok(self.fallback(
                ctx,
                input,
                best.category.clone(),
                FallbackReason::NoWhispersInCategory,
                rng,
            )),
        }
    }

    fn fallback<R: Rng + ?Sized>(
        &self,
        ctx: &RequestContext,
        input: String,
        category: String,
        reason: FallbackReason,
        rng: &mut R,
    ) -> WhisperResponse {
        let whisper = self.store.fallback.resolve(rng);
        info!(
            category = %category,
            reason = %reason,
            elapsed_us = ctx.elapsed().as_micros() as u64,
            "Fallback whisper served"
        );
        WhisperResponse::fallback(input, category, whisper, reason)
    }
}
