//! The four scan stages, ordered from most to least precise.
//!
//! Every stage sees only the eligible products and adds into one
//! [`Detected`] accumulator; the first stage to claim a SKU keeps it.

use crate::matcher::exclusion::ExclusionPatterns;
use crate::matcher::fuzzy::FuzzyIndex;
use crate::matcher::keywords::KeywordTable;
use crate::model::Product;
use crate::normalizer::literal_name;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static CAPITALIZED_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,4}").expect("valid capitalized phrase regex")
});

/// Products found so far, unique by SKU, in discovery order.
#[derive(Debug, Default)]
pub struct Detected<'a> {
    seen: HashSet<&'a str>,
    products: Vec<&'a Product>,
}

impl<'a> Detected<'a> {
    /// Returns false when the SKU was already claimed.
    pub fn add(&mut self, product: &'a Product) -> bool {
        if !self.seen.insert(product.sku.as_str()) {
            return false;
        }
        self.products.push(product);
        true
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products.into_iter().cloned().collect()
    }
}

/// Input shared by every stage of one scan.
pub struct ScanContext<'a> {
    pub text: &'a str,
    pub lowered: String,
    pub eligible: Vec<&'a Product>,
}

pub fn sku_literal<'a>(ctx: &ScanContext<'a>, found: &mut Detected<'a>) {
    for &product in &ctx.eligible {
        if ctx.lowered.contains(&product.sku.to_lowercase()) {
            found.add(product);
        }
    }
}

pub fn name_literal<'a>(ctx: &ScanContext<'a>, found: &mut Detected<'a>) {
    for &product in &ctx.eligible {
        let name = literal_name(&product.name);
        if !name.trim().is_empty() && ctx.lowered.contains(&name) {
            found.add(product);
        }
    }
}

/// One product per matched phrase: the first prefix with an eligible SKU wins.
pub fn keyword_table<'a>(ctx: &ScanContext<'a>, keywords: &KeywordTable, found: &mut Detected<'a>) {
    for rule in keywords.rules() {
        if !ctx.lowered.contains(&rule.phrase) {
            continue;
        }
        let pick = rule.prefixes.iter().find_map(|prefix| {
            ctx.eligible
                .iter()
                .copied()
                .find(|p| p.sku.starts_with(prefix.as_str()))
        });
        if let Some(product) = pick {
            found.add(product);
        }
    }
}

/// Limits for the fuzzy stage.
pub struct FuzzyGate<'r> {
    pub min_phrase_len: usize,
    pub accept_threshold: f64,
    pub stoplist: &'r [String],
    pub exclusions: &'r ExclusionPatterns,
}

/// Capitalized multi-word phrases from original-case text.
pub fn capitalized_phrases(text: &str) -> impl Iterator<Item = &str> {
    CAPITALIZED_PHRASE.find_iter(text).map(|m| m.as_str())
}

pub fn is_stoplisted(phrase: &str, stoplist: &[String]) -> bool {
    let lowered = phrase.to_lowercase();
    stoplist.iter().any(|w| lowered.contains(w.as_str()))
}

/// Queries the index per surviving phrase. `catalog` is the slice the index was built over.
pub fn fuzzy_phrases<'a>(
    ctx: &ScanContext<'a>,
    index: &FuzzyIndex,
    catalog: &'a [Product],
    gate: &FuzzyGate<'_>,
    found: &mut Detected<'a>,
) {
    for phrase in capitalized_phrases(ctx.text) {
        if phrase.chars().count() < gate.min_phrase_len || is_stoplisted(phrase, gate.stoplist) {
            continue;
        }
        let Some(hit) = index.best_phrase(phrase) else {
            continue;
        };
        if hit.score >= gate.accept_threshold {
            continue;
        }
        let Some(product) = catalog.get(hit.position) else {
            continue;
        };
        // The index spans the whole catalog, so excluded names can surface here.
        if gate.exclusions.is_excluded(&product.name) {
            continue;
        }
        found.add(product);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stoplist() -> Vec<String> {
        crate::config::DEFAULT_STOPLIST.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn capitalized_phrases_follow_word_pattern() {
        let phrases: Vec<&str> = capitalized_phrases(
            "Ask Sarah Johnson about Ultimate Selenium Tablets today. BTT is great. Single",
        )
        .collect();
        assert_eq!(phrases, vec!["Ask Sarah Johnson", "Ultimate Selenium Tablets"]);
    }

    #[test]
    fn phrases_are_capped_at_five_words() {
        let phrases: Vec<&str> = capitalized_phrases("One Two Three Four Five Six").collect();
        assert_eq!(phrases, vec!["One Two Three Four Five"]);
    }

    #[test]
    fn stoplist_matches_substrings() {
        let stop = stoplist();
        assert!(is_stoplisted("Vitamin Supplement", &stop));
        assert!(is_stoplisted("Healthy Body Start", &stop));
        assert!(!is_stoplisted("Ultimate Selenium", &stop));
    }

    #[test]
    fn detected_keeps_first_claim() {
        let a = Product {
            name: "A".into(),
            sku: "S1".into(),
            price: 1.0,
        };
        let b = a.clone();
        let mut found = Detected::default();
        assert!(found.add(&a));
        assert!(!found.add(&b));
        assert_eq!(found.len(), 1);
    }
}
