//! Approximate-match index over product names.
//!
//! Scores are dissimilarities in `0.0..=1.0`: 0 is an exact token match,
//! 1 shares nothing. A search query scores against an entry by the mean,
//! over query tokens, of the closest name token. Phrases found in free text
//! are scored in both directions so that an uncovered word on either side
//! costs a full miss.

use crate::model::Product;
use crate::normalizer::tokenize;

/// Phrase scoring counts a token pair farther apart than this as a miss.
const PHRASE_TOKEN_CEILING: f64 = 0.4;

#[derive(Debug, Clone)]
struct IndexedName {
    position: usize,
    tokens: Vec<String>,
}

/// A scored candidate; `position` indexes the product slice the index was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyHit {
    pub position: usize,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FuzzyIndex {
    entries: Vec<IndexedName>,
    threshold: f64,
    min_token_len: usize,
}

impl FuzzyIndex {
    pub fn build(products: &[Product], threshold: f64, min_token_len: usize) -> Self {
        let entries = products
            .iter()
            .enumerate()
            .map(|(position, p)| IndexedName {
                position,
                tokens: tokenize(&p.name, min_token_len),
            })
            .filter(|e| !e.tokens.is_empty())
            .collect();

        Self {
            entries,
            threshold,
            min_token_len,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidates within the index threshold, best first; ties keep catalog order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<FuzzyHit> {
        let query_tokens = tokenize(query, self.min_token_len);
        if query_tokens.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut hits: Vec<FuzzyHit> = self
            .entries
            .iter()
            .map(|entry| FuzzyHit {
                position: entry.position,
                score: entry_score(&query_tokens, &entry.tokens),
            })
            .filter(|hit| hit.score <= self.threshold)
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits.truncate(limit);
        hits
    }

    pub fn best(&self, query: &str) -> Option<FuzzyHit> {
        self.search(query, 1).into_iter().next()
    }

    /// Closest entry for a whole phrase, within the index threshold.
    ///
    /// Phrase words shorter than the minimum token length stay in the phrase
    /// but can never be covered.
    pub fn best_phrase(&self, phrase: &str) -> Option<FuzzyHit> {
        let words = tokenize(phrase, 1);
        if words.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .map(|entry| FuzzyHit {
                position: entry.position,
                score: phrase_score(&words, &entry.tokens, self.min_token_len),
            })
            .filter(|hit| hit.score <= self.threshold)
            .min_by(|a, b| a.score.total_cmp(&b.score))
    }
}

fn entry_score(query_tokens: &[String], name_tokens: &[String]) -> f64 {
    let total: f64 = query_tokens
        .iter()
        .map(|q| {
            name_tokens
                .iter()
                .map(|n| token_distance(q, n))
                .fold(1.0, f64::min)
        })
        .sum();
    total / query_tokens.len() as f64
}

/// Mean of phrase-word coverage and name-token coverage.
fn phrase_score(words: &[String], name_tokens: &[String], min_token_len: usize) -> f64 {
    let matchable: Vec<&String> = words
        .iter()
        .filter(|w| w.chars().count() >= min_token_len)
        .collect();

    let word_side: f64 = words
        .iter()
        .map(|w| {
            if w.chars().count() < min_token_len {
                return 1.0;
            }
            capped(name_tokens.iter().map(|n| token_distance(w, n)))
        })
        .sum::<f64>()
        / words.len() as f64;

    let name_side: f64 = name_tokens
        .iter()
        .map(|n| capped(matchable.iter().map(|w| token_distance(w, n))))
        .sum::<f64>()
        / name_tokens.len() as f64;

    (word_side + name_side) / 2.0
}

fn capped(distances: impl Iterator<Item = f64>) -> f64 {
    let best = distances.fold(1.0, f64::min);
    if best > PHRASE_TOKEN_CEILING { 1.0 } else { best }
}

/// Edit distance, softened when the query token is a prefix of the name token.
fn token_distance(query: &str, name: &str) -> f64 {
    let edit = 1.0 - strsim::normalized_levenshtein(query, name);
    if name.starts_with(query) {
        let name_len = name.chars().count() as f64;
        let missing = name_len - query.chars().count() as f64;
        edit.min(0.5 * missing / name_len)
    } else {
        edit
    }
}
