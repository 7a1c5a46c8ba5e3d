// Matcher module: detects catalog products mentioned in free text.

pub mod exclusion;
pub mod fuzzy;
pub mod keywords;
pub mod stages;

pub use exclusion::ExclusionPatterns;
pub use fuzzy::{FuzzyHit, FuzzyIndex};
pub use keywords::{KeywordRule, KeywordTable};

use crate::catalog::{Catalog, CatalogLoader};
use crate::config::MatcherConfig;
use crate::model::{CatalogError, ConfigError, Product};
use stages::{Detected, FuzzyGate, ScanContext};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Business data the scan stages consult besides the catalog.
#[derive(Debug, Clone)]
pub struct MatcherRules {
    pub keywords: KeywordTable,
    pub exclusions: ExclusionPatterns,
    pub stoplist: Vec<String>,
}

impl MatcherRules {
    pub fn from_config(cfg: &MatcherConfig) -> Result<Self, ConfigError> {
        let keywords = match &cfg.keywords_path {
            Some(path) => {
                info!("Loading keyword table from {}", path.display());
                KeywordTable::from_path(path)?
            }
            None => KeywordTable::builtin(),
        };
        let exclusions = ExclusionPatterns::new(&cfg.exclusion_patterns)?;
        let stoplist = cfg.stoplist.iter().map(|w| w.to_lowercase()).collect();

        Ok(Self {
            keywords,
            exclusions,
            stoplist,
        })
    }
}

/// A catalog plus the fuzzy index built over it. Immutable once constructed.
pub struct ProductMatcher {
    catalog: Catalog,
    index: FuzzyIndex,
    rules: MatcherRules,
    config: MatcherConfig,
}

impl ProductMatcher {
    pub fn new(catalog: Catalog, rules: MatcherRules, config: MatcherConfig) -> Self {
        let index = FuzzyIndex::build(
            catalog.products(),
            config.index_threshold,
            config.min_token_len,
        );
        Self {
            catalog,
            index,
            rules,
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Catalog entries whose names match no exclusion pattern.
    pub fn eligible(&self) -> impl Iterator<Item = &Product> {
        self.catalog
            .products()
            .iter()
            .filter(|p| !self.rules.exclusions.is_excluded(&p.name))
    }

    /// Products plausibly mentioned in `text`, unique by SKU.
    pub fn find_products_in_text(&self, text: &str) -> Vec<Product> {
        let ctx = ScanContext {
            text,
            lowered: text.to_lowercase(),
            eligible: self.eligible().collect(),
        };
        let mut found = Detected::default();

        stages::sku_literal(&ctx, &mut found);
        debug!("sku stage: {} products", found.len());

        stages::name_literal(&ctx, &mut found);
        debug!("name stage: {} products", found.len());

        stages::keyword_table(&ctx, &self.rules.keywords, &mut found);
        debug!("keyword stage: {} products", found.len());

        let gate = FuzzyGate {
            min_phrase_len: self.config.min_phrase_len,
            accept_threshold: self.config.accept_threshold,
            stoplist: &self.rules.stoplist,
            exclusions: &self.rules.exclusions,
        };
        stages::fuzzy_phrases(&ctx, &self.index, self.catalog.products(), &gate, &mut found);
        debug!("fuzzy stage: {} products", found.len());

        found.into_products()
    }

    /// Ranked lookup for manual selection. Excluded products are included.
    pub fn search_products(&self, query: &str) -> Vec<Product> {
        if query.chars().count() < self.config.search_min_query_len {
            return Vec::new();
        }
        let products = self.catalog.products();
        self.index
            .search(query, self.config.search_limit)
            .into_iter()
            .filter_map(|hit| products.get(hit.position).cloned())
            .collect()
    }

    pub fn get_product_by_sku(&self, sku: &str) -> Option<Product> {
        self.catalog.get(sku).cloned()
    }
}

/// Builds the matcher once on first `initialize` and serves every later call from it.
///
/// Before initialization completes, scans and searches return nothing.
pub struct SharedMatcher {
    cell: OnceCell<ProductMatcher>,
    rules: MatcherRules,
    config: MatcherConfig,
}

impl SharedMatcher {
    pub fn new(rules: MatcherRules, config: MatcherConfig) -> Self {
        Self {
            cell: OnceCell::new(),
            rules,
            config,
        }
    }

    pub async fn initialize<L>(&self, loader: &L) -> Result<&ProductMatcher, CatalogError>
    where
        L: CatalogLoader + ?Sized,
    {
        self.cell
            .get_or_try_init(|| async {
                let records = loader.load().await?;
                let catalog = Catalog::from_products(records);
                let matcher = ProductMatcher::new(catalog, self.rules.clone(), self.config.clone());
                info!(
                    "Product matcher initialized with {} products",
                    matcher.catalog().len()
                );
                Ok(matcher)
            })
            .await
    }

    pub fn get(&self) -> Option<&ProductMatcher> {
        self.cell.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    pub fn find_products_in_text(&self, text: &str) -> Vec<Product> {
        self.get()
            .map(|m| m.find_products_in_text(text))
            .unwrap_or_default()
    }

    pub fn search_products(&self, query: &str) -> Vec<Product> {
        self.get()
            .map(|m| m.search_products(query))
            .unwrap_or_default()
    }

    pub fn get_product_by_sku(&self, sku: &str) -> Option<Product> {
        self.get().and_then(|m| m.get_product_by_sku(sku))
    }
}
