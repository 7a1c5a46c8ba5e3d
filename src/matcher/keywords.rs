//! Keyword table: informal product-family phrases mapped to SKU prefixes.
//!
//! The table is data. A built-in default ships here and a JSON file of
//! `[{"phrase": "...", "prefixes": ["..."]}]` can replace it at startup.

use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One phrase and the SKU prefixes it may resolve to, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordRule {
    pub phrase: String,
    pub prefixes: Vec<String>,
}

impl KeywordRule {
    pub fn new(phrase: &str, prefixes: &[&str]) -> Self {
        Self {
            phrase: phrase.to_lowercase(),
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
}

impl KeywordTable {
    pub fn new(rules: Vec<KeywordRule>) -> Result<Self, ConfigError> {
        let mut normalized = Vec::with_capacity(rules.len());
        for rule in rules {
            let phrase = rule.phrase.trim().to_lowercase();
            if phrase.is_empty() {
                return Err(ConfigError::Invalid("keyword rule with empty phrase".into()));
            }
            let prefixes: Vec<String> = rule
                .prefixes
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if prefixes.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "keyword rule '{}' has no sku prefixes",
                    phrase
                )));
            }
            normalized.push(KeywordRule { phrase, prefixes });
        }
        Ok(Self { rules: normalized })
    }

    pub fn builtin() -> Self {
        Self {
            rules: DEFAULT_RULES
                .iter()
                .map(|(phrase, prefixes)| KeywordRule::new(phrase, prefixes))
                .collect(),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let rules: Vec<KeywordRule> = serde_json::from_str(content)?;
        Self::new(rules)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// Prefix order is a preference: single bottles before 4-packs, newer
// formulations (3.0 > 2.5 > 2.0) before "Original".
const DEFAULT_RULES: &[(&str, &[&str])] = &[
    ("healthy body start pak", &["10301", "10252Q", "10252", "10245"]),
    ("healthy start pak", &["10301", "10252Q", "10252", "10245"]),
    ("start pak", &["10301", "10252Q", "10252", "10245"]),
    ("start pack", &["10301", "10252Q", "10252", "10245"]),
    ("mighty 90", &["10301", "10252Q", "10252"]),
    ("90 essential", &["10301", "10252Q", "10252"]),

    ("healthy body brain and heart", &["10258", "10258Q", "10249"]),
    ("brain and heart pak", &["10258", "10258Q", "10249"]),
    ("brain and heart pack", &["10258", "10258Q", "10249"]),

    ("healthy body bone and joint", &["10256", "10256Q", "10247"]),
    ("bone and joint pak", &["10256", "10256Q", "10247"]),
    ("bone and joint pack", &["10256", "10256Q", "10247"]),
    ("pig pack", &["10256", "10256Q", "10247"]),

    ("healthy body blood sugar", &["10254", "10254Q", "10246"]),
    ("blood sugar pak", &["10254", "10254Q", "10246"]),
    ("blood sugar pack", &["10254", "10254Q", "10246"]),

    ("healthy body digestion", &["10257", "10257Q", "10248"]),
    ("digestion pak", &["10257", "10257Q", "10248"]),
    ("digestion pack", &["10257", "10257Q", "10248"]),

    ("healthy body athletic", &["10259", "10259Q", "10250"]),
    ("athletic pak", &["10259", "10259Q", "10250"]),
    ("athletic pack", &["10259", "10259Q", "10250"]),

    ("beyond tangy tangerine", &["USYG100076", "USYG100075", "USYG100077"]),
    ("tangy tangerine", &["USYG100076", "USYG100075", "USYG100077"]),
    ("btt 2.5", &["USYG100076"]),
    ("btt 2.0", &["USYG100076"]),
    ("btt", &["USYG100076"]),

    ("beyond osteo-fx", &["USYG100050", "USYG100051"]),
    ("beyond osteo fx", &["USYG100050", "USYG100051"]),
    ("osteo-fx", &["USYG100050", "USYG100051"]),
    ("osteo fx", &["USYG100050", "USYG100051"]),

    ("plant derived minerals", &["13203"]),
    ("plant minerals", &["13203"]),

    ("ultimate efa plus", &["20989"]),
    ("efa plus", &["20989"]),
    ("ultimate efa", &["20641", "21832"]),
    ("ultimate efas", &["20641", "21832"]),
    ("efas", &["20641", "21832"]),
    ("essential fatty acids", &["20641", "21832"]),
    ("omega 3", &["20641", "21832"]),
    ("multi-efa", &["USYG102165"]),

    ("ultimate enzymes", &["21211"]),
    ("gallbladder in a bottle", &["21211"]),

    ("fucoid z", &["3005"]),
    ("fucoidz", &["3005"]),
    ("fucoid", &["3005"]),
    ("z-radical", &["3235", "3207"]),
    ("zradical", &["3235", "3207"]),

    ("i26", &["USLL005030", "USLL006014", "USLL006011"]),
    ("i-26", &["USLL005030", "USLL006014", "USLL006011"]),
    ("hyper-immune egg", &["USLL005030", "USLL006014"]),
    ("hyperimmune egg", &["USLL005030", "USLL006014"]),
    ("immune factor", &["USLL005030", "USLL006014"]),

    ("nightly essence", &["65002"]),
    ("nightly essense", &["65002"]),
    ("bioluminescence", &["65002"]),

    ("ultimate microbiome", &["USYG300004"]),
    ("microbiome", &["USYG300004"]),

    ("herbal rainforest", &["13205"]),
    ("rainforest", &["13205"]),

    ("liver cleanse", &["PJ415"]),

    ("sweet eze", &["21014"]),
    ("sweeteze", &["21014"]),
    ("sweet-eze", &["21014"]),
    ("chromium and vanadium", &["21014"]),

    ("gluco-gel", &["21252", "21251", "13216"]),
    ("gluco gel", &["21252", "21251", "13216"]),
    ("glucogel", &["21252", "21251", "13216"]),
    ("glucosamine", &["21252", "21251"]),

    ("msm ultra", &["USFL000123"]),
    ("msm", &["USFL000123"]),
    ("ultimate msm", &["USFL000123"]),

    ("collagen peptides", &["USYG300005"]),
    ("collagen", &["USYG300005"]),

    ("cm cream", &["150203"]),
    ("ultimate cm cream", &["150203"]),

    ("osteo-mag", &["21210"]),
    ("osteomag", &["21210"]),
    ("magnesium", &["21210"]),

    ("ultimate daily classic", &["USYG100084"]),
    ("daily classic", &["USYG100084"]),

    ("ultimate niacin plus", &["USYG102684"]),
    ("niacin plus", &["USYG102684"]),
    ("ultimate niacin", &["USYG102684"]),

    ("synaptiv", &["USYG100083"]),
    ("synaptive", &["USYG100083"]),

    ("ultimate d-stress", &["82123"]),
    ("d-stress", &["82123"]),
    ("dstress", &["82123"]),

    ("cell shield rtq", &["21203"]),
    ("cell shield", &["21203"]),
    ("resveratrol", &["21203"]),

    ("ultimate selenium", &["20971", "20671"]),
    ("selenium", &["20971", "20671"]),

    ("imortalium", &["USYG100100"]),

    ("vitamin d3", &["USYG100099", "USYG100001"]),
    ("vitamin d", &["USYG100099", "USYG100001"]),
    ("d3", &["USYG100099"]),

    ("trauma oil", &["67043"]),
    ("trauma", &["67043"]),

    ("colloidal silver", &["USYG100401"]),
    ("silver", &["USYG100401"]),

    ("oceans gold", &["67507"]),
    ("ocean's gold", &["67507"]),
    ("ultimate ocean", &["67507"]),

    ("ultimate vision fx", &["21202"]),
    ("vision fx", &["21202"]),

    ("as slim as possible", &["USYG239001"]),
    ("asap", &["USYG239001"]),

    ("tmr shake", &["USSN100001", "USSN100000"]),
    ("total meal replacement", &["USSN100001", "USSN100000"]),

    ("rebound fx", &["USYG100062", "USYG100063"]),
    ("rebound", &["USYG100062"]),

    ("killer biotic", &["USYG3002"]),

    ("root beer belly", &["USYG100080"]),

    ("projoba omega", &["USPJ"]),

    ("good herbs", &["USGH"]),
    ("slender fx", &["USSF"]),
];
