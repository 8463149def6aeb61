//! Pipeline orchestration
//!
//! Wires the text provider, the image client, and the session together.
//! The chat path is a single round trip; the comic path is a four-stage
//! chain (story, review, visual prompt, image) where each stage's output
//! feeds the next stage's template verbatim.

use crate::config::SessionConfig;
use crate::error::{Result, StoryError};
use crate::pipeline::preferences::Preferences;
use crate::pipeline::progress::ProgressSink;
use crate::prompts;
use crate::providers::{FireworksClient, ImageRef, TextProvider};
use crate::session::{Session, Turn};

use std::sync::Arc;

/// Everything a finished comic run produced
#[derive(Debug, Clone)]
pub struct ComicArtifacts {
    /// Final story text, after the quality review
    pub story: String,
    /// Visual prompt composed from the story, before enhancement
    pub visual_prompt: String,
    /// Reference to the generated comic image
    pub image: ImageRef,
}

/// Orchestrates chat turns and comic generation over one session
pub struct Pipeline {
    text: Arc<dyn TextProvider>,
    image: FireworksClient,
    session_config: SessionConfig,
}

impl Pipeline {
    /// Create a new pipeline from its collaborators
    pub fn new(
        text: Arc<dyn TextProvider>,
        image: FireworksClient,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            text,
            image,
            session_config,
        }
    }

    /// Handles one chat turn: record the user's message, generate a
    /// reply, record the reply
    ///
    /// The reply sees the new message plus a short window of recent
    /// context rather than the whole history. When the provider fails,
    /// the user's message stays in the conversation so it still counts
    /// toward the story later.
    ///
    /// # Errors
    ///
    /// * `StoryError::Cooldown` - called again too soon
    /// * `StoryError::Busy` - a comic generation is in flight
    /// * any error from the text provider
    pub async fn handle_chat_turn(&self, session: &mut Session, message: &str) -> Result<String> {
        session.check_rate_limit()?;
        let _token = session.begin_processing()?;

        if session.conversation.trim() {
            tracing::debug!("Trimmed conversation to recent turns");
        }
        session.conversation.append(Turn::user(message));

        let context = session
            .conversation
            .recent_window(self.session_config.context_turns);
        let prompt = prompts::reply_prompt(message, &context);

        let reply = self.text.generate(&prompt).await?;
        session.conversation.append(Turn::assistant(&reply));

        Ok(reply)
    }

    /// Runs the full comic pipeline over the session's conversation
    ///
    /// Stages run strictly in order; stage milestones and image polls are
    /// reported to the progress sink. The conversation-length check comes
    /// before anything else so a too-short session costs no network
    /// calls. On success the enhanced prompt and the image are stored on
    /// the session for later regeneration.
    ///
    /// # Errors
    ///
    /// * `StoryError::NotEnoughConversation` - fewer turns than required
    /// * `StoryError::Cooldown` - called again too soon
    /// * `StoryError::Busy` - another generation is in flight
    /// * any text-provider or image-service error
    pub async fn generate_comic(
        &self,
        session: &mut Session,
        prefs: &Preferences,
        progress: &dyn ProgressSink,
    ) -> Result<ComicArtifacts> {
        let required = self.session_config.min_comic_turns;
        if session.conversation.len() < required {
            return Err(StoryError::NotEnoughConversation { required }.into());
        }
        session.check_rate_limit()?;
        let _token = session.begin_processing()?;

        tracing::info!(
            "Generating comic: style={}, tone={}, panels={}",
            prefs.style.key(),
            prefs.tone.key(),
            prefs.panels
        );

        let transcript = session.conversation.transcript();
        let story = self
            .text
            .generate(&prompts::story_prompt(&transcript))
            .await?;
        progress.stage(25, "Crafting your story");

        // The reviewer's output replaces the story unconditionally; there
        // is no structured approve/edit signal to branch on.
        let story = self.text.generate(&prompts::review_prompt(&story)).await?;
        progress.stage(50, "Polishing the narrative");

        let visual = self
            .text
            .generate(&prompts::visual_prompt(&story, prefs))
            .await?;
        progress.stage(75, "Designing your comic");

        let enhanced = prompts::enhance_comic_prompt(&visual, prefs.panels);
        let image = self.image.generate(&enhanced, progress).await?;
        progress.stage(100, "Bringing your comic to life");

        session.store_story(story.clone());
        session.store_comic(enhanced, image.clone());

        Ok(ComicArtifacts {
            story,
            visual_prompt: visual,
            image,
        })
    }

    /// Generates an alternative rendition of the last comic
    ///
    /// Reuses the stored enhanced prompt with a variation suffix; no text
    /// stages run. The stored prompt is kept as-is so repeated
    /// regenerations all vary the same base.
    ///
    /// # Errors
    ///
    /// * `StoryError::NothingToRegenerate` - no comic generated yet
    /// * `StoryError::Cooldown` - called again too soon
    /// * `StoryError::Busy` - another generation is in flight
    /// * any image-service error
    pub async fn regenerate(
        &self,
        session: &mut Session,
        progress: &dyn ProgressSink,
    ) -> Result<ImageRef> {
        let enhanced = session
            .last_enhanced_prompt()
            .ok_or(StoryError::NothingToRegenerate)?
            .to_string();
        session.check_rate_limit()?;
        let _token = session.begin_processing()?;

        tracing::info!("Regenerating last comic");
        let varied = prompts::regenerate_prompt(&enhanced);
        let image = self.image.generate(&varied, progress).await?;

        session.store_comic(enhanced, image.clone());
        Ok(image)
    }
}
