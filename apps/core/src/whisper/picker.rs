use rand::seq::SliceRandom;
use rand::Rng;

use super::content::{MessagePool, Whisper};

/// Picks a whisper uniformly from a category's pool.
///
/// Returns `None` when the category has no pool or an empty one.
pub fn pick_whisper<R: Rng + ?Sized>(pool: &MessagePool, category: &str, rng: &mut R) -> Option<Whisper> {
    pool.lookup(category)?.choose(rng).cloned()
}
