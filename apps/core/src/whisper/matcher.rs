//! Keyword scoring and category ranking.
//!
//! Every keyword of every category is tried against the normalized input
//! with a fixed ladder of methods; the first method that succeeds decides
//! that keyword's contribution. Contributions of one category add up.
//!
//! | Method | Score |
//! |---|---|
//! | input equals keyword | 15 |
//! | keyword appears as a whole phrase | 10 |
//! | all words of a multi-word keyword present | 8 |
//! | single keyword equals an input word | 12 |
//! | prefix either way (both ≥ 2 chars) | 8 |
//! | substring either way, length ratio > 0.4 | 4 |
//!
//! Ranking: higher score first, lower tier on equal scores. Any positive
//! score is eligible.

use std::cmp::Ordering;

use super::content::{AliasTable, CategoryTierTable};

/// Version of the scoring policy above. Bump when a constant or rule changes.
pub const SCORING_VERSION: u32 = 3;

/// Minimum length (chars) of both words for prefix/substring matching.
const MIN_FUZZY_LEN: usize = 2;
/// Keyword words longer than this may match inside an input word.
const LOOSE_WORD_MIN_LEN: usize = 3;
/// Shorter/longer ratio a substring match must exceed.
const MIN_SUBSTRING_RATIO: f32 = 0.4;

/// How a keyword matched the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    ExactInput,
    Phrase,
    AllWords,
    ExactWord,
    Prefix,
    Substring,
}

impl MatchMethod {
    pub fn score(self) -> u32 {
        match self {
            MatchMethod::ExactInput => 15,
            MatchMethod::Phrase => 10,
            MatchMethod::AllWords => 8,
            MatchMethod::ExactWord => 12,
            MatchMethod::Prefix => 8,
            MatchMethod::Substring => 4,
        }
    }
}

/// A category that scored above zero for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    pub category: String,
    pub score: u32,
    pub tier: u32,
}

/// Scores a single keyword against the input.
///
/// `input` must already be normalized; `input_words` are its whitespace
/// separated words. The keyword is trimmed and lowercased here, and an empty
/// keyword never matches.
pub fn match_keyword(input: &str, input_words: &[&str], keyword: &str) -> Option<MatchMethod> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return None;
    }

    if input == keyword {
        return Some(MatchMethod::ExactInput);
    }

    if format!(" {} ", input).contains(&format!(" {} ", keyword)) {
        return Some(MatchMethod::Phrase);
    }

    let keyword_words: Vec<&str> = keyword.split_whitespace().collect();
    if keyword_words.len() > 1 {
        let all_present = keyword_words.iter().all(|kw| {
            input_words.iter().any(|word| {
                word == kw || (kw.chars().count() > LOOSE_WORD_MIN_LEN && word.contains(kw))
            })
        });
        return all_present.then_some(MatchMethod::AllWords);
    }

    input_words
        .iter()
        .find_map(|word| match_single_word(word, &keyword))
}

fn match_single_word(word: &str, keyword: &str) -> Option<MatchMethod> {
    if word == keyword {
        return Some(MatchMethod::ExactWord);
    }

    let word_len = word.chars().count();
    let keyword_len = keyword.chars().count();
    if word_len < MIN_FUZZY_LEN || keyword_len < MIN_FUZZY_LEN {
        return None;
    }

    if word.starts_with(keyword) || keyword.starts_with(word) {
        return Some(MatchMethod::Prefix);
    }

    if word.contains(keyword) || keyword.contains(word) {
        let ratio = word_len.min(keyword_len) as f32 / word_len.max(keyword_len) as f32;
        if ratio > MIN_SUBSTRING_RATIO {
            return Some(MatchMethod::Substring);
        }
    }

    None
}

/// Orders candidates best first: score descending, then tier ascending.
///
/// The sort is stable, so full ties keep alias-table order.
pub fn rank(candidates: &mut [MatchCandidate]) {
    candidates.sort_by(compare);
}

fn compare(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.score.cmp(&a.score).then(a.tier.cmp(&b.tier))
}

/// Scores every category of an alias table against an input.
pub struct CategoryMatcher<'a> {
    aliases: &'a AliasTable,
    tiers: &'a CategoryTierTable,
}

impl<'a> CategoryMatcher<'a> {
    pub fn new(aliases: &'a AliasTable, tiers: &'a CategoryTierTable) -> Self {
        Self { aliases, tiers }
    }

    /// All categories with a positive score, in alias-table order.
    pub fn candidates(&self, normalized: &str) -> Vec<MatchCandidate> {
        let input_words: Vec<&str> = normalized.split_whitespace().collect();

        self.aliases
            .iter()
            .filter_map(|(category, keywords)| {
                let score: u32 = keywords
                    .iter()
                    .filter_map(|keyword| match_keyword(normalized, &input_words, keyword))
                    .map(MatchMethod::score)
                    .sum();
                (score > 0).then(|| MatchCandidate {
                    category: category.to_string(),
                    score,
                    tier: self.tiers.tier_of(category),
                })
            })
            .collect()
    }

    /// Candidates sorted best first.
    pub fn ranked(&self, normalized: &str) -> Vec<MatchCandidate> {
        let mut candidates = self.candidates(normalized);
        rank(&mut candidates);
        candidates
    }

    /// The winning category, if any category scored. Full ties go to the
    /// category written first in the alias table.
    pub fn best(&self, normalized: &str) -> Option<MatchCandidate> {
        self.candidates(normalized).into_iter().min_by(compare)
    }
}
