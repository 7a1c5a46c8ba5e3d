// Synthesizer module: turns research sources into a client report.

pub mod client;
pub mod fallback;
pub mod prompt;

pub use client::{LlmClient, Provider};
pub use fallback::fallback_article;

use crate::model::{SynthesisError, SynthesisRequest};
use tracing::warn;

#[async_trait::async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, req: &SynthesisRequest) -> Result<String, SynthesisError>;
}

/// Outcome of a synthesis attempt; `error` is set when the fallback article was used.
#[derive(Debug)]
pub struct Report {
    pub article: String,
    pub error: Option<SynthesisError>,
}

/// Never fails: a synthesis error is logged and replaced by the fallback article.
pub async fn synthesize_or_fallback(
    synthesizer: Option<&dyn Synthesizer>,
    req: &SynthesisRequest,
) -> Report {
    let result = match synthesizer {
        Some(s) => s.synthesize(req).await,
        None => Err(SynthesisError::NotConfigured),
    };

    match result {
        Ok(article) => Report {
            article,
            error: None,
        },
        Err(e) => {
            warn!("AI synthesis failed: {}", e);
            Report {
                article: fallback_article(req),
                error: Some(e),
            }
        }
    }
}

/// Text scanned for products: every source, then the article, space-joined.
pub fn detection_text(req: &SynthesisRequest, article: &str) -> String {
    req.sources
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(article))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Result<String, ()>);

    #[async_trait::async_trait]
    impl Synthesizer for Canned {
        async fn synthesize(&self, _req: &SynthesisRequest) -> Result<String, SynthesisError> {
            self.0.clone().map_err(|_| SynthesisError::EmptyResponse)
        }
    }

    fn request() -> SynthesisRequest {
        SynthesisRequest {
            sources: vec!["Source one.".into(), "Source two.".into()],
            coach_name: "Coach AJ".into(),
            client_name: "Jane Doe".into(),
        }
    }

    #[tokio::test]
    async fn successful_synthesis_is_returned() {
        let s = Canned(Ok("# Article".into()));
        let report = synthesize_or_fallback(Some(&s), &request()).await;
        assert_eq!(report.article, "# Article");
        assert!(report.error.is_none());
    }

    #[tokio::test]
    async fn failure_uses_fallback() {
        let s = Canned(Err(()));
        let report = synthesize_or_fallback(Some(&s), &request()).await;
        assert!(matches!(report.error, Some(SynthesisError::EmptyResponse)));
        assert!(report.article.contains("**Source 2:**\nSource two."));
    }

    #[tokio::test]
    async fn missing_synthesizer_uses_fallback() {
        let report = synthesize_or_fallback(None, &request()).await;
        let error = report.error.unwrap();
        assert!(matches!(error, SynthesisError::NotConfigured));
        assert_eq!(error.to_string(), "No AI provider is configured");
        assert!(report.article.starts_with("# Health Recommendations for Jane Doe"));
    }

    #[test]
    fn detection_text_joins_sources_and_article() {
        assert_eq!(
            detection_text(&request(), "Article."),
            "Source one. Source two. Article."
        );
    }
}
