//! Error types for ImageScout.
//!
//! Errors are split between startup concerns (configuration files) and
//! per-request concerns (missing credentials, upstream failures, bad input).
//! Model-output parsing never produces an error: the stages that parse model
//! text degrade to a deterministic default instead.

use std::fmt;
use thiserror::Error;

/// Top-level error type for ImageScout operations.
#[derive(Error, Debug)]
pub enum ScoutError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Search pipeline errors
    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// The external service a request-level error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    /// The language/vision model provider
    Model,
    /// The stock-photo search provider
    Photos,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::Model => write!(f, "OpenAI"),
            Upstream::Photos => write!(f, "Unsplash"),
        }
    }
}

/// Errors raised while serving a single search request.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A required credential is missing
    #[error("{upstream} is not configured: {message}")]
    NotConfigured { upstream: Upstream, message: String },

    /// Transport failure, non-success status, or unusable provider response
    #[error("{upstream} request failed: {message}")]
    Upstream {
        upstream: Upstream,
        message: String,
        status_code: Option<u16>,
    },

    /// A required request field is missing or malformed
    #[error("Invalid request: {0}")]
    Validation(String),

    /// A requested result page came back empty
    #[error("No results on page {page} for '{keywords}'")]
    PageExhausted { page: u32, keywords: String },
}

impl SearchError {
    pub(crate) fn model(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Upstream {
            upstream: Upstream::Model,
            message: message.into(),
            status_code,
        }
    }

    pub(crate) fn photos(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Upstream {
            upstream: Upstream::Photos,
            message: message.into(),
            status_code,
        }
    }
}

/// Convenience type alias for ImageScout results.
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Convenience type alias for request-level results.
pub type PipelineResult<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_names_provider() {
        let err = SearchError::NotConfigured {
            upstream: Upstream::Photos,
            message: "access key missing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsplash is not configured: access key missing"
        );
    }

    #[test]
    fn test_upstream_helper_sets_status() {
        match SearchError::model("HTTP 503", Some(503)) {
            SearchError::Upstream {
                upstream,
                status_code,
                ..
            } => {
                assert_eq!(upstream, Upstream::Model);
                assert_eq!(status_code, Some(503));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
