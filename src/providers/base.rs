//! Base text-provider trait
//!
//! All four pipeline roles (reply, story, review, visual prompt) share a
//! single provider abstraction: one prompt string in, one text string
//! out. Each call is awaited before the next stage begins; the roles form
//! a strict sequential pipeline with no parallelism.

use crate::error::Result;
use async_trait::async_trait;

/// Provider trait for hosted text-generation services
///
/// # Examples
///
/// ```
/// use storystrip::providers::TextProvider;
/// use storystrip::error::Result;
/// use async_trait::async_trait;
///
/// struct CannedProvider;
///
/// #[async_trait]
/// impl TextProvider for CannedProvider {
///     async fn generate(&self, _prompt: &str) -> Result<String> {
///         Ok("a canned reply".to_string())
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let provider = CannedProvider;
/// let reply = provider.generate("how was your day?").await.unwrap();
/// assert_eq!(reply, "a canned reply");
/// # });
/// ```
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Completes a single prompt and returns the generated text
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, or a non-success
    /// response from the service.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
