//! Configuration management for Storystrip
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files and environment variables. Both external
//! service credentials are resolved from the environment; a missing
//! credential is a fatal startup condition.

use crate::error::{Result, StoryError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the text-generation service API key
pub const TEXT_API_KEY_VAR: &str = "GROQ_API_KEY";

/// Environment variable holding the image-generation service API key
pub const IMAGE_API_KEY_VAR: &str = "FIREWORKS_API_KEY";

/// Main configuration structure for Storystrip
///
/// This structure holds all configuration needed for the pipeline,
/// including text and image service settings and session behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Text-generation service configuration
    #[serde(default)]
    pub text: TextServiceConfig,

    /// Image-generation service configuration
    #[serde(default)]
    pub image: ImageServiceConfig,

    /// Session behavior configuration
    #[serde(default)]
    pub session: SessionConfig,
}

/// Text-generation service configuration
///
/// The service is treated as an opaque collaborator: one prompt string in,
/// one text string out, with a configurable timeout and temperature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextServiceConfig {
    /// API base URL (overridable so tests can point at a mock server)
    #[serde(default = "default_text_api_base")]
    pub api_base: String,

    /// Model identifier sent with each completion request
    #[serde(default = "default_text_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_text_timeout")]
    pub timeout_seconds: u64,

    /// API key; resolved from the environment when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_text_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_text_model() -> String {
    "openai/gpt-oss-120b".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_text_timeout() -> u64 {
    30
}

impl Default for TextServiceConfig {
    fn default() -> Self {
        Self {
            api_base: default_text_api_base(),
            model: default_text_model(),
            temperature: default_temperature(),
            timeout_seconds: default_text_timeout(),
            api_key: None,
        }
    }
}

/// Image-generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageServiceConfig {
    /// API base URL (overridable so tests can point at a mock server)
    #[serde(default = "default_image_api_base")]
    pub api_base: String,

    /// Workflow path appended to the base URL for submit and poll requests
    #[serde(default = "default_image_model_path")]
    pub model_path: String,

    /// Maximum number of result polls before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// API key; resolved from the environment when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_image_api_base() -> String {
    "https://api.fireworks.ai/inference/v1".to_string()
}

fn default_image_model_path() -> String {
    "workflows/accounts/fireworks/models/flux-kontext-pro".to_string()
}

fn default_max_attempts() -> u32 {
    60
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for ImageServiceConfig {
    fn default() -> Self {
        Self {
            api_base: default_image_api_base(),
            model_path: default_image_model_path(),
            max_attempts: default_max_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
            api_key: None,
        }
    }
}

/// Session behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cooldown between user-triggered actions, in seconds
    #[serde(default = "default_cooldown")]
    pub cooldown_seconds: u64,

    /// Conversation length above which the history is trimmed
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Number of most recent turns kept by a trim
    #[serde(default = "default_trim_to")]
    pub trim_to: usize,

    /// Number of recent turns fed to the chat reply as context
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,

    /// Minimum conversation length before a comic can be generated
    #[serde(default = "default_min_comic_turns")]
    pub min_comic_turns: usize,
}

fn default_cooldown() -> u64 {
    3
}

fn default_max_history() -> usize {
    30
}

fn default_trim_to() -> usize {
    20
}

fn default_context_turns() -> usize {
    5
}

fn default_min_comic_turns() -> usize {
    4
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: default_cooldown(),
            max_history: default_max_history(),
            trim_to: default_trim_to(),
            context_turns: default_context_turns(),
            min_comic_turns: default_min_comic_turns(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text: TextServiceConfig::default(),
            image: ImageServiceConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, falling back to defaults when
    /// the file does not exist
    ///
    /// After parsing, API keys missing from the file are resolved from the
    /// `GROQ_API_KEY` and `FIREWORKS_API_KEY` environment variables.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Yaml` if the file exists but cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            tracing::debug!("Loading configuration from {}", path.display());
            let contents = std::fs::read_to_string(path).map_err(StoryError::Io)?;
            serde_yaml::from_str(&contents).map_err(StoryError::Yaml)?
        } else {
            tracing::debug!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            Config::default()
        };

        config.resolve_credentials();
        Ok(config)
    }

    /// Fill in API keys from the environment when the file did not set them
    fn resolve_credentials(&mut self) {
        if self.text.api_key.is_none() {
            if let Ok(key) = std::env::var(TEXT_API_KEY_VAR) {
                if !key.is_empty() {
                    self.text.api_key = Some(key);
                }
            }
        }
        if self.image.api_key.is_none() {
            if let Ok(key) = std::env::var(IMAGE_API_KEY_VAR) {
                if !key.is_empty() {
                    self.image.api_key = Some(key);
                }
            }
        }
    }

    /// Validate the configuration
    ///
    /// Checks that both service credentials are present and that the
    /// session and polling parameters are sane. A missing credential is a
    /// fatal startup condition.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.text.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(StoryError::Config(format!(
                "missing text service API key: set {} or text.api_key",
                TEXT_API_KEY_VAR
            ))
            .into());
        }
        if self.image.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(StoryError::Config(format!(
                "missing image service API key: set {} or image.api_key",
                IMAGE_API_KEY_VAR
            ))
            .into());
        }
        if self.image.max_attempts == 0 {
            return Err(
                StoryError::Config("image.max_attempts must be greater than 0".to_string()).into(),
            );
        }
        if self.session.trim_to > self.session.max_history {
            return Err(StoryError::Config(
                "session.trim_to must not exceed session.max_history".to_string(),
            )
            .into());
        }
        if self.session.min_comic_turns == 0 {
            return Err(StoryError::Config(
                "session.min_comic_turns must be greater than 0".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
