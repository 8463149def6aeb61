//! Session state: conversation history, rate limiting, and the
//! processing guard
//!
//! All mutable per-session state lives in an explicit [`Session`] context
//! object that is passed to every pipeline operation. Nothing here is
//! process-global; a session's lifecycle is bound to the shell session
//! that created it.

use crate::error::{Result, StoryError};
use crate::providers::ImageRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sender of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human journaling about their day
    User,
    /// The journal companion's reply
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in the conversation, tagged by sender role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl Turn {
    /// Creates a new user turn
    ///
    /// # Examples
    ///
    /// ```
    /// use storystrip::session::{Role, Turn};
    ///
    /// let turn = Turn::user("long day at work");
    /// assert_eq!(turn.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only conversation history with a hard trim window
///
/// Turns are never reordered; trimming only removes from the front and is
/// invoked explicitly before processing a turn, not automatically on every
/// append.
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<Turn>,
    max_len: usize,
    trim_to: usize,
}

impl Conversation {
    /// Creates an empty conversation with the given trim window
    ///
    /// # Arguments
    ///
    /// * `max_len` - Length above which `trim` discards old turns
    /// * `trim_to` - Number of most recent turns a trim keeps
    pub fn new(max_len: usize, trim_to: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_len,
            trim_to,
        }
    }

    /// Appends a turn to the end of the history; O(1)
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Trims the history to the most recent `trim_to` turns when it has
    /// grown past `max_len`
    ///
    /// Returns true when a trim actually happened, so callers can surface
    /// a notice to the user.
    pub fn trim(&mut self) -> bool {
        if self.turns.len() > self.max_len {
            let drop = self.turns.len() - self.trim_to;
            self.turns.drain(..drop);
            tracing::debug!("Conversation trimmed to the last {} turns", self.trim_to);
            true
        } else {
            false
        }
    }

    /// Returns the last `k` turns formatted as `"role: content"` lines
    ///
    /// Used to build bounded-size prompts: the chat reply sees a short
    /// recent window, story generation sees the full transcript.
    pub fn recent_window(&self, k: usize) -> String {
        let start = self.turns.len().saturating_sub(k);
        self.turns[start..]
            .iter()
            .map(|t| format!("{}: {}", t.role, t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns the full history formatted as `"role: content"` lines
    pub fn transcript(&self) -> String {
        self.recent_window(self.turns.len())
    }

    /// Serializes the history as plain `"ROLE: content"` lines for export
    pub fn export(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role.to_string().to_uppercase(), t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns a reference to all turns
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns in the conversation
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if the conversation has no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Removes all turns
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

/// A purely local gate enforcing a minimum interval between
/// user-triggered actions
///
/// No queuing and no backoff: a refused attempt is simply refused, and it
/// does not reset the cooldown window.
#[derive(Debug)]
pub struct RateLimiter {
    cooldown: Duration,
    last_accepted: Option<Instant>,
}

impl RateLimiter {
    /// Creates a rate limiter with the given cooldown
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: None,
        }
    }

    /// Returns true and records the timestamp when enough time has passed
    /// since the last accepted action; false otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use storystrip::session::RateLimiter;
    /// use std::time::{Duration, Instant};
    ///
    /// let mut limiter = RateLimiter::new(Duration::from_secs(3));
    /// let now = Instant::now();
    /// assert!(limiter.allow(now));
    /// assert!(!limiter.allow(now + Duration::from_secs(1)));
    /// assert!(limiter.allow(now + Duration::from_secs(3)));
    /// ```
    pub fn allow(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.duration_since(last) < self.cooldown {
                tracing::debug!("Rate limiter refused an action inside the cooldown window");
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

/// Token marking a long-running action as in flight
///
/// Dropping the token clears the session's processing flag, so the flag
/// is released on every exit path, success or failure.
pub struct ProcessingToken {
    flag: Arc<AtomicBool>,
}

impl Drop for ProcessingToken {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Per-session mutable state passed explicitly to pipeline operations
///
/// Holds the conversation, the rate limiter, the processing flag, and the
/// most recent generated artifacts (kept so the user can regenerate an
/// alternative rendition of the same comic).
pub struct Session {
    /// Conversation history
    pub conversation: Conversation,
    limiter: RateLimiter,
    processing: Arc<AtomicBool>,
    last_story: Option<String>,
    last_enhanced_prompt: Option<String>,
    last_image: Option<ImageRef>,
}

impl Session {
    /// Creates a fresh session
    ///
    /// # Arguments
    ///
    /// * `config` - Session behavior parameters (trim window, cooldown)
    pub fn new(config: &crate::config::SessionConfig) -> Self {
        Self {
            conversation: Conversation::new(config.max_history, config.trim_to),
            limiter: RateLimiter::new(Duration::from_secs(config.cooldown_seconds)),
            processing: Arc::new(AtomicBool::new(false)),
            last_story: None,
            last_enhanced_prompt: None,
            last_image: None,
        }
    }

    /// Applies the rate-limit gate for a user-triggered action
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Cooldown` when the previous accepted action was
    /// less than the cooldown ago.
    pub fn check_rate_limit(&mut self) -> Result<()> {
        if self.limiter.allow(Instant::now()) {
            Ok(())
        } else {
            Err(StoryError::Cooldown.into())
        }
    }

    /// Marks a long-running action as in flight
    ///
    /// Returns a token whose drop releases the flag. A second call while a
    /// token is alive is refused; rejected triggers are not queued.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Busy` when an action is already in flight.
    pub fn begin_processing(&self) -> Result<ProcessingToken> {
        if self
            .processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(StoryError::Busy.into());
        }
        Ok(ProcessingToken {
            flag: Arc::clone(&self.processing),
        })
    }

    /// Returns true while a long-running action is in flight
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// Stores the artifacts of the latest comic generation
    pub fn store_comic(&mut self, enhanced_prompt: String, image: ImageRef) {
        self.last_enhanced_prompt = Some(enhanced_prompt);
        self.last_image = Some(image);
    }

    /// Stores the final story of the latest comic generation
    pub fn store_story(&mut self, story: String) {
        self.last_story = Some(story);
    }

    /// Returns the final story of the latest comic, if any
    pub fn last_story(&self) -> Option<&str> {
        self.last_story.as_deref()
    }

    /// Returns the enhanced prompt of the latest comic, if any
    pub fn last_enhanced_prompt(&self) -> Option<&str> {
        self.last_enhanced_prompt.as_deref()
    }

    /// Returns the latest generated image reference, if any
    pub fn last_image(&self) -> Option<&ImageRef> {
        self.last_image.as_ref()
    }

    /// Clears the conversation and all stored artifacts
    pub fn clear(&mut self) {
        self.conversation.clear();
        self.last_story = None;
        self.last_enhanced_prompt = None;
        self.last_image = None;
    }
}
