//! Configuration management for ImageScout.
//!
//! Configuration is loaded from a TOML file with sensible defaults, then a
//! handful of process environment variables are layered on top (`PORT`,
//! `HTTPS_PROXY`/`HTTP_PROXY`). Credentials are written as
//! `${ENV_VAR}` references so the file can be committed without secrets.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for ImageScout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Model provider settings
    pub llm: LlmConfig,

    /// Photo search provider settings
    pub photos: PhotosConfig,

    /// Multi-page search settings
    pub search: SearchConfig,

    /// Best-image selector settings
    pub selector: SelectorConfig,

    /// Outbound call timeouts
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.imagescout.imagescout/config.toml
    /// - Linux: ~/.config/imagescout/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\imagescout\config\config.toml
    ///
    /// Falls back to ~/.imagescout/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "imagescout", "imagescout")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".imagescout").join("config.toml")
            })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides using an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            self.server.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("PORT must be a port number, got '{port}'"))
            })?;
        }
        if resolve_with(&self.llm.proxy, &lookup).is_none() {
            if let Some(proxy) = ["HTTPS_PROXY", "HTTP_PROXY"]
                .iter()
                .find_map(|name| lookup(*name).filter(|v| !v.trim().is_empty()))
            {
                self.llm.proxy = proxy;
            }
        }
        self.validate()
    }

    /// Resolved model API key, if one is configured.
    pub fn llm_api_key(&self) -> Option<String> {
        resolve_env_var(&self.llm.api_key)
    }

    /// Resolved photo search access key, if one is configured.
    pub fn photos_access_key(&self) -> Option<String> {
        resolve_env_var(&self.photos.access_key)
    }

    /// Resolved outbound proxy for model calls, if any.
    pub fn llm_proxy(&self) -> Option<String> {
        resolve_env_var(&self.llm.proxy)
    }

    /// Get the resolved static file directory (with ~ expansion).
    pub fn static_dir(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.server.static_dir);
        PathBuf::from(expanded.into_owned())
    }

    /// Address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
///
/// Plain strings pass through; empty strings and unset or empty variables
/// resolve to `None`.
pub fn resolve_env_var(value: &str) -> Option<String> {
    resolve_with(value, &|name: &str| std::env::var(name).ok())
}

fn resolve_with<F>(value: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = value.trim();
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        lookup(var_name).filter(|v| !v.trim().is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
