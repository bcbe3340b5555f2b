//! LLM provider trait and request/response types.
//!
//! Defines the interface the pipeline stages talk to, plus the factory that
//! builds the configured provider.

use crate::config::Config;
use crate::error::{ConfigError, PipelineResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A single chat-completion request: one system prompt, one user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// Model identifier
    pub model: String,
    /// System prompt
    pub system_prompt: String,
    /// Text part of the user turn
    pub prompt: String,
    /// Image URLs attached to the user turn, in order
    pub image_urls: Vec<String>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl LlmRequest {
    /// Build a text-only request with default sampling settings.
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            prompt: prompt.into(),
            image_urls: Vec::new(),
            max_tokens: 1000,
            temperature: 0.1,
        }
    }

    /// Attach image URLs to the user turn.
    pub fn with_images<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// The response from a model call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text, trimmed (may be empty)
    pub text: String,
    /// Model identifier reported by the provider
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all model providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Arc<dyn LlmProvider>` shared across stages).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "openai").
    fn name(&self) -> &str;

    /// Run a chat completion.
    async fn generate(&self, request: &LlmRequest) -> PipelineResult<LlmResponse>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Factory that creates the model provider from configuration.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the configured provider.
    ///
    /// Returns `Ok(None)` when no API key is configured; stages then apply
    /// their own missing-credential policy. Fails only on settings that can
    /// never work, such as an unparseable proxy URL.
    pub fn create(config: &Config) -> Result<Option<Arc<dyn LlmProvider>>, ConfigError> {
        let Some(api_key) = config.llm_api_key() else {
            tracing::warn!("OpenAI API key not set. Set OPENAI_API_KEY env var.");
            return Ok(None);
        };

        let proxy = config.llm_proxy();
        if let Some(proxy) = &proxy {
            tracing::info!("Using proxy for model calls: {proxy}");
        }

        let provider: Arc<dyn LlmProvider> = Arc::new(super::openai::OpenAiProvider::new(
            &api_key,
            &config.llm.endpoint,
            Duration::from_millis(config.limits.llm_timeout_ms),
            proxy.as_deref(),
        )?);
        Ok(Some(provider))
    }
}
