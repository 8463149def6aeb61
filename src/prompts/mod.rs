//! Fixed instruction templates for the text-generation pipeline
//!
//! Four roles share one text-generation client and differ only in the
//! template and the upstream text fed in: the conversational reply, the
//! storyteller, the quality reviewer, and the visual-prompt composer.
//! The comic enhancement boilerplate appended before image generation
//! also lives here.

pub mod chat;
pub mod comic;

pub use chat::reply_prompt;
pub use comic::{enhance_comic_prompt, regenerate_prompt, review_prompt, story_prompt,
    visual_prompt};
