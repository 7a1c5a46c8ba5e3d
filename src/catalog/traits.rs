use crate::model::{CatalogError, Product};

/// Supplies the raw product records the matcher is built from.
#[async_trait::async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<Product>, CatalogError>;
}
