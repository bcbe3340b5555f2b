//! OpenAI LLM provider using the Chat Completions API.
//!
//! Images are passed by URL as `image_url` content parts of the user message.

use super::provider::{LlmProvider, LlmRequest, LlmResponse};
use crate::error::{ConfigError, PipelineResult, SearchError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl OpenAiProvider {
    /// Create a provider, optionally routing all calls through `proxy`.
    pub fn new(
        api_key: &str,
        endpoint: &str,
        timeout: Duration,
        proxy: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| {
                ConfigError::ValidationError(format!("invalid llm.proxy '{proxy}': {e}"))
            })?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().map_err(|e| {
            ConfigError::ValidationError(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            api_key: api_key.to_string(),
            client,
            endpoint: endpoint.to_string(),
            timeout,
        })
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ChatContent>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

fn user_content(request: &LlmRequest) -> MessageContent {
    if request.image_urls.is_empty() {
        return MessageContent::Text(request.prompt.clone());
    }

    let mut parts = Vec::with_capacity(request.image_urls.len() + 1);
    parts.push(ChatContent::Text {
        text: request.prompt.clone(),
    });
    parts.extend(request.image_urls.iter().map(|url| ChatContent::ImageUrl {
        image_url: ImageUrl { url: url.clone() },
    }));
    MessageContent::Parts(parts)
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &LlmRequest) -> PipelineResult<LlmResponse> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(request.system_prompt.clone()),
                },
                ChatMessage {
                    role: "user",
                    content: user_content(request),
                },
            ],
        };

        tracing::debug!(
            model = %request.model,
            images = request.image_urls.len(),
            "OpenAI chat completion request"
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| SearchError::model(format!("OpenAI request failed: {e}"), None))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SearchError::model(
                format!("OpenAI HTTP {status}: {text}"),
                Some(status.as_u16()),
            ));
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| {
            SearchError::model(format!("Failed to parse OpenAI response: {e}"), None)
        })?;

        let choice = chat_resp.choices.into_iter().next().ok_or_else(|| {
            SearchError::model(
                "OpenAI returned empty choices array - no content generated",
                None,
            )
        })?;
        let text = choice.message.content.unwrap_or_default();

        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(model = %chat_resp.model, latency_ms, "OpenAI response received");

        Ok(LlmResponse {
            text: text.trim().to_string(),
            model: chat_resp.model,
            tokens_used: chat_resp.usage.map(|u| u.total_tokens),
            latency_ms,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
