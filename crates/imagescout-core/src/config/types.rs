//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on (overridden by `PORT`)
    pub port: u16,

    /// Directory with the frontend's static files; skipped when it doesn't exist
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "frontend".to_string(),
        }
    }
}

/// Language/vision model provider settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat completions endpoint
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model used for keyword extraction and the text-only selection fallback
    pub keyword_model: String,

    /// Vision-capable model used by the quality gate and the selector
    pub vision_model: String,

    /// Outbound proxy URL (supports ${ENV_VAR} syntax).
    /// Empty falls back to HTTPS_PROXY, then HTTP_PROXY.
    pub proxy: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
            keyword_model: "gpt-4o".to_string(),
            vision_model: "gpt-4o".to_string(),
            proxy: String::new(),
        }
    }
}

/// Photo search provider settings (Unsplash).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotosConfig {
    /// API base URL
    pub endpoint: String,

    /// Access key (supports ${ENV_VAR} syntax)
    pub access_key: String,

    /// Results requested per page
    pub per_page: u32,

    /// Orientation filter ("landscape", "portrait" or "squarish")
    pub orientation: String,
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.unsplash.com".to_string(),
            access_key: "${UNSPLASH_ACCESS_KEY}".to_string(),
            per_page: 8,
            orientation: "landscape".to_string(),
        }
    }
}

/// Multi-page search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum pages fetched before the last one is force-accepted
    pub max_pages: u32,

    /// Run the quality gate after each page. When false every page passes.
    pub quality_gate: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_pages: 2,
            quality_gate: true,
        }
    }
}

/// Best-image selector settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// On vision failure, retry the choice with the images' text captions
    pub text_fallback: bool,
}

/// Per-call timeouts for outbound requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Model call timeout in milliseconds
    pub llm_timeout_ms: u64,

    /// Photo search timeout in milliseconds
    pub photo_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            llm_timeout_ms: 60_000,
            photo_timeout_ms: 30_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
