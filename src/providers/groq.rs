//! Groq text-generation client
//!
//! Implements the TextProvider trait against Groq's OpenAI-compatible
//! chat completions endpoint. The service is an opaque collaborator: a
//! single prompt goes in as one user message, a single text string comes
//! back.

use crate::config::TextServiceConfig;
use crate::error::{Result, StoryError};
use crate::providers::TextProvider;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Groq API provider
///
/// # Examples
///
/// ```no_run
/// use storystrip::config::TextServiceConfig;
/// use storystrip::providers::{GroqProvider, TextProvider};
///
/// # async fn example() -> storystrip::error::Result<()> {
/// let config = TextServiceConfig {
///     api_key: Some("gsk_test".to_string()),
///     ..Default::default()
/// };
/// let provider = GroqProvider::new(config)?;
/// let reply = provider.generate("Say hello").await?;
/// # Ok(())
/// # }
/// ```
pub struct GroqProvider {
    client: Client,
    config: TextServiceConfig,
}

/// Request structure for the chat completions endpoint
#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<RequestMessage>,
    temperature: f32,
}

/// Message structure for the chat completions endpoint
#[derive(Debug, Serialize)]
struct RequestMessage {
    role: String,
    content: String,
}

/// Response structure from the chat completions endpoint
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

impl GroqProvider {
    /// Create a new Groq provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Text service configuration (base URL, model, timeout)
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: TextServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("storystrip/0.2.0")
            .build()
            .map_err(StoryError::Network)?;

        tracing::info!(
            "Initialized text provider: base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl TextProvider for GroqProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.api_base);

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![RequestMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
        };

        tracing::debug!(
            "Sending completion request: model={}, prompt_len={}",
            request.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Text generation request failed: {}", e);
                StoryError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Text service returned error {}: {}", status, error_text);
            return Err(StoryError::Generation(format!(
                "service returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse completion response: {}", e);
            StoryError::Generation(format!("failed to parse response: {}", e))
        })?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(StoryError::Generation("empty completion".to_string()).into());
        }

        tracing::debug!("Completion received: {} chars", text.len());
        Ok(text.trim().to_string())
    }
}
