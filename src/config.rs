use crate::model::{ConfigError, ResearchSession};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_EXCLUSION_PATTERNS: &[&str] = &[r"essential\s*oil", "fragrance", "aromatherapy"];

/// Generic words that cause false positives in the fuzzy stage.
pub const DEFAULT_STOPLIST: &[&str] = &[
    "oil", "oils", "essential oil", "essential oils",
    "the", "and", "for", "with", "your", "this", "that", "from",
    "health", "healthy", "body", "support", "helps", "help",
    "vitamin", "vitamins", "mineral", "minerals", "nutrient", "nutrients",
    "supplement", "supplements", "product", "products",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
    /// Takes precedence over `path` when set.
    pub url: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("products.json"),
            url: None,
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Candidates scoring above this never leave the fuzzy index.
    pub index_threshold: f64,
    /// The fuzzy scan stage accepts only scores strictly below this.
    pub accept_threshold: f64,
    pub min_token_len: usize,
    pub min_phrase_len: usize,
    pub search_min_query_len: usize,
    pub search_limit: usize,
    /// Replaces the built-in keyword table when set.
    pub keywords_path: Option<PathBuf>,
    pub exclusion_patterns: Vec<String>,
    pub stoplist: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            index_threshold: 0.4,
            accept_threshold: 0.25,
            min_token_len: 3,
            min_phrase_len: 8,
            search_min_query_len: 2,
            search_limit: 10,
            keywords_path: None,
            exclusion_patterns: DEFAULT_EXCLUSION_PATTERNS.iter().map(|p| p.to_string()).collect(),
            stoplist: DEFAULT_STOPLIST.iter().map(|w| w.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "google".into(),
            model: "gemini-2.5-flash".into(),
            api_key: None,
            timeout_seconds: 90,
            temperature: 0.7,
            max_output_tokens: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    pub base_url: String,
    pub ga_id: String,
    pub redirect: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ygy1.com/customer-checkout/v1.3/".into(),
            ga_id: "UA-20019232-44".into(),
            redirect: "http://dailywithdoc.com/thank-you".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: ResearchSession,
    pub catalog: CatalogConfig,
    pub matcher: MatcherConfig,
    pub llm: LlmConfig,
    pub checkout: CheckoutConfig,
    pub output_dir: Option<PathBuf>,
}

impl AppConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.matcher;
        if !(0.0..=1.0).contains(&m.index_threshold) || !(0.0..=1.0).contains(&m.accept_threshold) {
            return Err(ConfigError::Invalid(
                "matcher thresholds must lie within 0.0..=1.0".into(),
            ));
        }
        if m.accept_threshold > m.index_threshold {
            return Err(ConfigError::Invalid(
                "accept_threshold must not exceed index_threshold".into(),
            ));
        }
        if m.search_limit == 0 {
            return Err(ConfigError::Invalid("search_limit must be positive".into()));
        }
        Ok(())
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = parse_config("{}").unwrap();
        assert_eq!(cfg.matcher.index_threshold, 0.4);
        assert_eq!(cfg.matcher.accept_threshold, 0.25);
        assert_eq!(cfg.matcher.min_token_len, 3);
        assert_eq!(cfg.matcher.search_limit, 10);
        assert_eq!(cfg.matcher.exclusion_patterns.len(), 3);
        assert!(cfg.matcher.stoplist.contains(&"vitamin".to_string()));
        assert_eq!(cfg.llm.timeout_seconds, 90);
        assert_eq!(cfg.catalog.path, PathBuf::from("products.json"));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = parse_config(
            r#"{
                "session": {"coach_name": "Coach AJ", "client_name": "Jane", "distributor_id": "42"},
                "matcher": {"search_limit": 5},
                "llm": {"provider": "openrouter", "model": "openai/gpt-4o-mini"}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.session.coach_name, "Coach AJ");
        assert!(cfg.session.sources.is_empty());
        assert_eq!(cfg.matcher.search_limit, 5);
        assert_eq!(cfg.matcher.min_phrase_len, 8);
        assert_eq!(cfg.llm.provider, "openrouter");
        assert_eq!(cfg.llm.max_output_tokens, 8000);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let err = parse_config(r#"{"matcher": {"index_threshold": 0.2, "accept_threshold": 0.3}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(parse_config("{"), Err(ConfigError::Parse(_))));
    }
}
