use crate::catalog::traits::CatalogLoader;
use crate::model::{CatalogError, Product};

use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Reads a JSON array of `{name, sku, price}` records from disk.
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CatalogLoader for JsonFileLoader {
    async fn load(&self) -> Result<Vec<Product>, CatalogError> {
        info!("Loading catalog from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await?;
        let products: Vec<Product> = serde_json::from_str(&content)?;
        Ok(products)
    }
}

/// Fetches the same JSON document over HTTP.
pub struct HttpCatalogLoader {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpCatalogLoader {
    pub fn new(url: impl Into<String>, timeout_seconds: u64) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(concat!("coach-synth/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout: Duration::from_secs(timeout_seconds),
        })
    }
}

#[async_trait::async_trait]
impl CatalogLoader for HttpCatalogLoader {
    async fn load(&self) -> Result<Vec<Product>, CatalogError> {
        info!("Fetching catalog from {}", self.url);
        let response = match timeout(self.timeout, self.client.get(&self.url).send()).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                warn!("Catalog request failed: {:?}", e);
                return Err(CatalogError::HttpError(e.to_string()));
            }
            Err(_) => {
                warn!("Catalog request timed out after {:?}", self.timeout);
                return Err(CatalogError::Timeout);
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::InvalidResponse(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::HttpError(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Serves a fixed product list; used when the catalog is already in memory.
pub struct StaticLoader {
    products: Vec<Product>,
}

impl StaticLoader {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait::async_trait]
impl CatalogLoader for StaticLoader {
    async fn load(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn json_file_loader_reads_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Ultimate EFA Plus™", "sku": "20989", "price": 39.95}}]"#
        )
        .unwrap();

        let products = JsonFileLoader::new(file.path()).load().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].sku, "20989");
        assert_eq!(products[0].name, "Ultimate EFA Plus™");
    }

    #[tokio::test]
    async fn json_file_loader_reports_missing_file() {
        let err = JsonFileLoader::new("/nonexistent/catalog.json")
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[tokio::test]
    async fn json_file_loader_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = JsonFileLoader::new(file.path()).load().await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
