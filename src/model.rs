// Core structs: Product, CartItem, ResearchSession
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A sellable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub sku: String,
    pub price: f64,
}

/// A product that entered the user's working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub selected: bool,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            selected: true,
            quantity: 1,
        }
    }
}

/// Everything a coach enters before synthesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSession {
    pub coach_name: String,
    pub client_name: String,
    pub distributor_id: String,
    pub sources: Vec<String>,
}

pub const MIN_SOURCE_CHARS: usize = 50;
pub const MAX_SOURCES: usize = 3;

impl ResearchSession {
    /// Checks that the session carries enough to synthesize a report.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.coach_name.trim().is_empty() {
            return Err(SessionError::MissingCoachName);
        }
        if self.client_name.trim().is_empty() {
            return Err(SessionError::MissingClientName);
        }
        if self.distributor_id.trim().is_empty() {
            return Err(SessionError::MissingDistributorId);
        }
        if self.sources.len() > MAX_SOURCES {
            return Err(SessionError::TooManySources(MAX_SOURCES));
        }
        if !self
            .sources
            .iter()
            .any(|s| s.trim().chars().count() > MIN_SOURCE_CHARS)
        {
            return Err(SessionError::NoUsableSource(MIN_SOURCE_CHARS));
        }
        Ok(())
    }

    /// Trimmed, non-empty sources in input order.
    pub fn usable_sources(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn synthesis_request(&self) -> SynthesisRequest {
        SynthesisRequest {
            sources: self.usable_sources(),
            coach_name: self.coach_name.trim().to_string(),
            client_name: self.client_name.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub sources: Vec<String>,
    pub coach_name: String,
    pub client_name: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog request failed: {0}")]
    HttpError(String),
    #[error("catalog request timed out")]
    Timeout,
    #[error("catalog endpoint responded with status {0}")]
    InvalidResponse(u16),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid exclusion pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("No API key provided. Please set a {0} API key.")]
    MissingApiKey(String),
    #[error("No AI provider is configured")]
    NotConfigured,
    #[error("unknown LLM provider '{0}'")]
    UnknownProvider(String),
    #[error("LLM request failed: {0}")]
    HttpError(String),
    #[error("Request timed out after {0} seconds. Try a faster model like Gemini Flash.")]
    Timeout(u64),
    #[error("LLM API responded with status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("No content generated")]
    EmptyResponse,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("coach name is required")]
    MissingCoachName,
    #[error("client name is required")]
    MissingClientName,
    #[error("distributor id is required")]
    MissingDistributorId,
    #[error("at least one research source longer than {0} characters is required")]
    NoUsableSource(usize),
    #[error("at most {0} research sources are supported")]
    TooManySources(usize),
}
