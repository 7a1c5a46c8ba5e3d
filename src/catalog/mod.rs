// Catalog module: the immutable sku-keyed product list and its loaders.

pub mod loader;
pub mod traits;

pub use loader::{HttpCatalogLoader, JsonFileLoader, StaticLoader};
pub use traits::CatalogLoader;

use crate::config::CatalogConfig;
use crate::model::{CatalogError, Product};
use std::collections::HashMap;
use tracing::warn;

/// Validated product list with a unique `sku` per entry.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_sku: HashMap<String, usize>,
}

impl Catalog {
    /// Keeps the first record for each SKU and skips records that cannot be sold.
    pub fn from_products(records: Vec<Product>) -> Self {
        let mut products = Vec::with_capacity(records.len());
        let mut by_sku = HashMap::with_capacity(records.len());

        for mut product in records {
            product.sku = product.sku.trim().to_string();
            if product.sku.is_empty() || product.name.trim().is_empty() {
                warn!("Skipping catalog record without sku or name: {:?}", product);
                continue;
            }
            if !product.price.is_finite() || product.price < 0.0 {
                warn!("Skipping {} with invalid price {}", product.sku, product.price);
                continue;
            }
            if by_sku.contains_key(&product.sku) {
                warn!("Duplicate sku {} ignored ({})", product.sku, product.name);
                continue;
            }
            by_sku.insert(product.sku.clone(), products.len());
            products.push(product);
        }

        Self { products, by_sku }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, sku: &str) -> Option<&Product> {
        self.by_sku.get(sku).map(|&i| &self.products[i])
    }
}

/// Picks the HTTP loader when a catalog URL is configured, the file loader otherwise.
pub fn loader_from_config(cfg: &CatalogConfig) -> Result<Box<dyn CatalogLoader>, CatalogError> {
    match &cfg.url {
        Some(url) => Ok(Box::new(HttpCatalogLoader::new(url.clone(), cfg.timeout_seconds)?)),
        None => Ok(Box::new(JsonFileLoader::new(cfg.path.clone()))),
    }
}
