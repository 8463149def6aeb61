//! Comic generation templates
//!
//! The three remaining text roles (storyteller, quality reviewer and
//! visual-prompt composer) plus the fixed formatting boilerplate appended
//! to the visual prompt before it reaches the image generator. The roles
//! form a strict pipeline: each template embeds the previous stage's
//! output verbatim.

use crate::pipeline::Preferences;

/// Builds the storyteller prompt from the full conversation transcript
pub fn story_prompt(transcript: &str) -> String {
    format!(
        r#"You are a master storyteller turning a journal conversation into a short narrative.

Conversation:
{transcript}

Create the story systematically:
1. Extract the key characters, events, and emotions
2. Organize them chronologically
3. Add narrative structure (beginning, middle, end)
4. Keep it concise but engaging (2-3 sentences)

Focus on the most interesting or emotional moments."#
    )
}

/// Builds the quality-review prompt for a generated story
///
/// The reviewer may return the story unchanged (approved) or an edited
/// version; there is no structured signal distinguishing the two, so the
/// caller always treats the output as the new authoritative story text.
pub fn review_prompt(story: &str) -> String {
    format!(
        r#"You are a content quality specialist reviewing a short story.

Story: {story}

Quality review process:
1. Is it clear and engaging?
2. Appropriate for all audiences?
3. Good narrative flow and pacing?
4. Any improvements needed?

Provide an enhanced version if needed, otherwise return the story as-is."#
    )
}

/// Builds the visual-prompt composition template from the final story and
/// the user's preferences
pub fn visual_prompt(story: &str, prefs: &Preferences) -> String {
    let style = prefs.style;
    let tone = prefs.tone;
    let panels = prefs.panels;
    format!(
        r#"You are a visual storytelling expert planning a comic strip.

Story: {story}
Style: {style}
Tone: {tone}
Panels: {panels}

Visual planning for comic strip generation:
1. Create a {panels}-panel comic strip layout
2. Describe consistent characters throughout all panels
3. Plan clear sequential storytelling
4. Integrate the {style} aesthetic with the {tone} mood
5. Ensure each panel shows clear action or emotion
6. Include speech bubbles or thought bubbles where appropriate

Create a detailed, specific prompt that will generate a high-quality comic strip.
Focus on character expressions, panel composition, and scene setting."#
    )
}

/// Appends the fixed comic-formatting boilerplate to a composed visual
/// prompt
///
/// The boilerplate carries the panel count, layout hints, and style cues
/// the image generator needs regardless of story content.
pub fn enhance_comic_prompt(comic_prompt: &str, panels: u8) -> String {
    format!(
        r#"{comic_prompt}

High quality comic strip illustration, {panels} panels arranged horizontally or in a grid layout,
clear panel borders, consistent character design throughout all panels,
professional comic book illustration style, vibrant colors, detailed artwork,
speech bubbles with readable text, dynamic compositions, expressive characters."#
    )
}

/// Varies a previously enhanced prompt for a second rendition of the same
/// comic
pub fn regenerate_prompt(enhanced_prompt: &str) -> String {
    format!(
        "{enhanced_prompt} Alternative visual interpretation, different camera angles and compositions."
    )
}
