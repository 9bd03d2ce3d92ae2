//! Configuration loading and validation for tidechat.
//!
//! Loads configuration from `~/.tidechat/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! The API key is only ever read from the config file or the environment —
//! it is not accepted as interactive input and is redacted from Debug
//! output.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.tidechat/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Maximum number of messages kept in the model-facing context window
    #[serde(default = "default_max_context_messages")]
    pub max_context_messages: usize,

    /// Maximum characters kept from an extracted file
    #[serde(default = "default_max_file_chars")]
    pub max_file_chars: usize,

    /// Default system prompt
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_api_url() -> String {
    "https://api.deepseek.com/v1".into()
}
fn default_model() -> String {
    "deepseek-chat".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_context_messages() -> usize {
    8
}
fn default_max_file_chars() -> usize {
    1000
}
fn default_system_prompt() -> String {
    "You are an expert AI assistant. Provide detailed and accurate answers.".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("max_context_messages", &self.max_context_messages)
            .field("max_file_chars", &self.max_file_chars)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.tidechat/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `TIDECHAT_API_KEY`, then `DEEPSEEK_API_KEY` for the key
    /// - `TIDECHAT_API_URL` for the endpoint
    /// - `TIDECHAT_MODEL` for the model
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(key) = std::env::var("TIDECHAT_API_KEY") {
            config.api_key = Some(key);
        } else if let Ok(key) = std::env::var("DEEPSEEK_API_KEY") {
            config.api_key = Some(key);
        }

        if let Ok(url) = std::env::var("TIDECHAT_API_URL") {
            config.api_url = url;
        }

        if let Ok(model) = std::env::var("TIDECHAT_MODEL") {
            config.default_model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".tidechat")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_context_messages == 0 {
            return Err(ConfigError::ValidationError(
                "max_context_messages must be at least 1".into(),
            ));
        }

        if self.max_file_chars == 0 {
            return Err(ConfigError::ValidationError(
                "max_file_chars must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `onboard`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            max_context_messages: default_max_context_messages(),
            max_file_chars: default_max_file_chars(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
