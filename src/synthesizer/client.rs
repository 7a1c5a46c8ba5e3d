use crate::config::LlmConfig;
use crate::model::{SynthesisError, SynthesisRequest};
use crate::synthesizer::prompt::build_prompts;
use crate::synthesizer::Synthesizer;

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

const GOOGLE_AI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    OpenRouter,
}

impl Provider {
    pub fn parse(id: &str) -> Result<Self, SynthesisError> {
        match id.trim().to_lowercase().as_str() {
            "google" => Ok(Provider::Google),
            "openrouter" => Ok(Provider::OpenRouter),
            other => Err(SynthesisError::UnknownProvider(other.to_string())),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Provider::Google => "Google AI",
            Provider::OpenRouter => "OpenRouter",
        }
    }

    fn key_env_var(self) -> &'static str {
        match self {
            Provider::Google => "GOOGLE_API_KEY",
            Provider::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

pub struct LlmClient {
    client: Client,
    provider: Provider,
    model: String,
    api_key: String,
    timeout_seconds: u64,
    temperature: f32,
    max_output_tokens: u32,
}

impl LlmClient {
    /// Uses the configured key, falling back to the provider's environment variable.
    pub fn from_config(cfg: &LlmConfig) -> Result<Self, SynthesisError> {
        let provider = Provider::parse(&cfg.provider)?;
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(provider.key_env_var()).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SynthesisError::MissingApiKey(provider.label().to_string()))?;

        let client = Client::builder()
            .build()
            .map_err(|e| SynthesisError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            provider,
            model: cfg.model.clone(),
            api_key: api_key.trim().to_string(),
            timeout_seconds: cfg.timeout_seconds,
            temperature: cfg.temperature,
            max_output_tokens: cfg.max_output_tokens,
        })
    }

    fn request(&self, req: &SynthesisRequest) -> reqwest::RequestBuilder {
        let prompts = build_prompts(req);
        match self.provider {
            Provider::Google => {
                let url = format!("{}/{}:generateContent", GOOGLE_AI_API_URL, self.model);
                self.client
                    .post(url)
                    .query(&[("key", self.api_key.as_str())])
                    .json(&json!({
                        "contents": [{
                            "parts": [{ "text": format!("{}\n\n{}", prompts.system, prompts.user) }]
                        }],
                        "generationConfig": {
                            "temperature": self.temperature,
                            "maxOutputTokens": self.max_output_tokens,
                        },
                    }))
            }
            Provider::OpenRouter => self
                .client
                .post(OPENROUTER_API_URL)
                .bearer_auth(&self.api_key)
                .header("X-Title", "Coach Synth")
                .json(&json!({
                    "model": self.model,
                    "messages": [
                        { "role": "system", "content": prompts.system },
                        { "role": "user", "content": prompts.user },
                    ],
                    "temperature": self.temperature,
                    "max_tokens": self.max_output_tokens,
                })),
        }
    }
}

#[async_trait::async_trait]
impl Synthesizer for LlmClient {
    async fn synthesize(&self, req: &SynthesisRequest) -> Result<String, SynthesisError> {
        info!(
            "Requesting synthesis from {} ({}) for {} sources",
            self.provider.label(),
            self.model,
            req.sources.len()
        );

        let response = match timeout(
            Duration::from_secs(self.timeout_seconds),
            self.request(req).send(),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                warn!("LLM send() failed: {:?}", e);
                return Err(SynthesisError::HttpError(e.to_string()));
            }
            Err(_) => {
                warn!("LLM request timed out");
                return Err(SynthesisError::Timeout(self.timeout_seconds));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(api_error(status, &body));
        }

        let body = decode_success(response).await?;
        extract_article(self.provider, &body).ok_or(SynthesisError::EmptyResponse)
    }
}

async fn decode_success(response: reqwest::Response) -> Result<Value, SynthesisError> {
    response.json().await.map_err(|e| {
        warn!("LLM response body could not be decoded: {:?}", e);
        SynthesisError::HttpError(e.to_string())
    })
}

/// Error for a non-success status; the body's `error.message` is used when present.
fn api_error(status: reqwest::StatusCode, body: &Value) -> SynthesisError {
    let message = body
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("request failed: {}", status));
    SynthesisError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Pulls the generated text out of a provider response body.
pub fn extract_article(provider: Provider, body: &Value) -> Option<String> {
    let pointer = match provider {
        Provider::Google => "/candidates/0/content/parts/0/text",
        Provider::OpenRouter => "/choices/0/message/content",
    };
    body.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
