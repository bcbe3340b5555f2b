//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

const ORIENTATIONS: &[&str] = &["landscape", "portrait", "squarish"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    ///
    /// Missing credentials are deliberately not checked here: they surface
    /// per request so the server can still start and report them.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.llm.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.endpoint must not be empty".into(),
            ));
        }
        if self.llm.keyword_model.trim().is_empty() || self.llm.vision_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.keyword_model and llm.vision_model must not be empty".into(),
            ));
        }
        if self.photos.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "photos.endpoint must not be empty".into(),
            ));
        }
        if !(1..=30).contains(&self.photos.per_page) {
            return Err(ConfigError::ValidationError(
                "photos.per_page must be between 1 and 30".into(),
            ));
        }
        if !ORIENTATIONS.contains(&self.photos.orientation.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "photos.orientation must be one of {}",
                ORIENTATIONS.join(", ")
            )));
        }
        if self.search.max_pages == 0 {
            return Err(ConfigError::ValidationError(
                "search.max_pages must be > 0".into(),
            ));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.photo_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.photo_timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
