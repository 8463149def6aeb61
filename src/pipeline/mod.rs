//! Comic generation pipeline
//!
//! User preferences, progress reporting, and the orchestrator tying the
//! text and image services to a session.

pub mod orchestrator;
pub mod preferences;
pub mod progress;

pub use orchestrator::{ComicArtifacts, Pipeline};
pub use preferences::{ArtStyle, Preferences, StoryTone, MAX_PANELS, MIN_PANELS};
pub use progress::{LogProgress, NullProgress, ProgressSink};
