//! Error types for Storystrip
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Storystrip operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, text generation, image generation, and
/// pipeline orchestration.
#[derive(Error, Debug)]
pub enum StoryError {
    /// Configuration-related errors (including missing credentials)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure talking to an external service
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Text-generation service returned an unusable response
    #[error("Text generation error: {0}")]
    Generation(String),

    /// Image service accepted the HTTP call but returned no job id
    #[error("Image service returned no request id")]
    Submission,

    /// Image service explicitly reported a failed generation
    #[error("Image generation failed: {0}")]
    GenerationFailed(String),

    /// Inline image payload could not be decoded
    #[error("Image decode error: {0}")]
    Decode(String),

    /// Poll budget exhausted without reaching a terminal status
    #[error("Image generation timed out after {attempts} polling attempts")]
    PollTimeout {
        /// Number of polls performed before giving up
        attempts: u32,
    },

    /// Service reported success but the response carried no image data
    #[error("No image data returned by the service")]
    MissingImage,

    /// Rate limiter refused the action
    #[error("Please wait a moment between requests")]
    Cooldown,

    /// Not enough conversation to build a story from
    #[error("Chat a little more first: at least {required} messages are needed to build a story")]
    NotEnoughConversation {
        /// Minimum number of turns required
        required: usize,
    },

    /// Another long-running action is already in flight for this session
    #[error("Another generation is already in progress")]
    Busy,

    /// A regeneration was requested before any comic existed
    #[error("Generate a comic first before asking for a variation")]
    NothingToRegenerate,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Storystrip operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
