//! Pre-match content filters.
//!
//! Both predicates run before category matching; a hit on either one sends
//! the request straight to the fallback resolver.

use regex::Regex;
use std::sync::LazyLock;

/// Everything that is not an ASCII letter.
// NOTE: expect() is acceptable here, the pattern is a compile-time constant.
static NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z]+").expect("Invalid regex: non-alphabetic pattern"));

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Below this many letters the gibberish heuristics are not applied.
const MIN_LETTERS_TO_JUDGE: usize = 3;
/// A letter repeated this many times in a row marks keyboard mash.
const REPEAT_RUN: usize = 3;
const MIN_VOWEL_RATIO: f32 = 0.1;
const MAX_CONSONANT_RATIO: f32 = 0.9;

/// Profanity and slur fragments matched anywhere in the input.
///
/// Matching is plain substring containment without word boundaries, so
/// innocent words that embed a fragment are flagged too. Widening or
/// tightening this list changes which inputs get a real category.
const DENYLIST: &[&str] = &["fuck", "shit", "bitch", "cunt", "asshole", "whore", "slut"];

/// Which filter rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    Gibberish,
    Offensive,
}

/// Runs the filters in order (gibberish first) and reports the first hit.
pub fn screen(input: &str) -> Option<FilterVerdict> {
    if is_gibberish(input) {
        Some(FilterVerdict::Gibberish)
    } else if is_offensive(input) {
        Some(FilterVerdict::Offensive)
    } else {
        None
    }
}

/// Keyboard-mash and degenerate repetition detector.
///
/// Works on the letters only (digits, spaces and punctuation are dropped), so
/// runs can span word boundaries.
pub fn is_gibberish(input: &str) -> bool {
    let letters = NON_ALPHA.replace_all(input, "").to_lowercase();
    let total = letters.chars().count();
    if total < MIN_LETTERS_TO_JUDGE {
        return false;
    }

    if has_repeated_run(&letters, REPEAT_RUN) {
        return true;
    }

    let vowels = letters.chars().filter(|c| VOWELS.contains(c)).count();
    let consonants = letters
        .chars()
        .filter(|c| c.is_ascii_lowercase() && !VOWELS.contains(c))
        .count();

    let vowel_ratio = vowels as f32 / total as f32;
    let consonant_ratio = consonants as f32 / total as f32;

    vowel_ratio < MIN_VOWEL_RATIO || consonant_ratio > MAX_CONSONANT_RATIO
}

/// Case-insensitive denylist containment.
pub fn is_offensive(input: &str) -> bool {
    let lower = input.to_lowercase();
    DENYLIST.iter().any(|fragment| lower.contains(fragment))
}

fn has_repeated_run(text: &str, run: usize) -> bool {
    let mut previous = None;
    let mut streak = 0;
    for c in text.chars() {
        if Some(c) == previous {
            streak += 1;
        } else {
            previous = Some(c);
            streak = 1;
        }
        if streak >= run {
            return true;
        }
    }
    false
}
