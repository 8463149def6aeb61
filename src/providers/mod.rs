//! External service clients
//!
//! This module defines the TextProvider trait for hosted language models
//! and the two concrete clients: Groq for text generation and Fireworks
//! for asynchronous image generation.

pub mod base;
pub mod fireworks;
pub mod groq;

pub use base::TextProvider;
pub use fireworks::{FireworksClient, ImageRef, JobStatus};
pub use groq::GroqProvider;
