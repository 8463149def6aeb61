//! Storystrip - comic journal CLI library
//!
//! This library provides the core functionality for the Storystrip comic
//! journal: a chat companion backed by a hosted language model, and a
//! four-stage pipeline that turns the conversation into a comic strip
//! through an asynchronous image-generation service.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Conversation history, rate limiting, and the processing guard
//! - `providers`: Text and image service clients (Groq, Fireworks)
//! - `prompts`: Fixed instruction templates for each text-generation role
//! - `pipeline`: Preferences, progress reporting, and orchestration
//! - `shell`: The interactive readline loop
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use storystrip::config::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml")?;
//!     config.validate()?;
//!
//!     // Pipeline and shell setup would go here
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod shell;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, StoryError};
pub use pipeline::{ComicArtifacts, Pipeline, Preferences};
pub use providers::{FireworksClient, GroqProvider, ImageRef};
pub use session::Session;
pub use shell::Shell;
