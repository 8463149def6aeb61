//! User preferences for comic generation
//!
//! Art style, story tone, and panel count. Styles and tones are closed
//! sets; the panel count is validated on construction so the rest of the
//! pipeline can treat a [`Preferences`] value as always renderable.

use crate::error::{Result, StoryError};
use std::fmt;
use std::str::FromStr;

/// Smallest allowed panel count
pub const MIN_PANELS: u8 = 1;

/// Largest allowed panel count
pub const MAX_PANELS: u8 = 6;

/// Visual art style for the generated comic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtStyle {
    Cartoonish,
    Manga,
    NewYorker,
    Watercolor,
    Minimalist,
    PixelArt,
    ComicBook,
}

impl ArtStyle {
    /// All styles, in menu order
    pub const ALL: [ArtStyle; 7] = [
        ArtStyle::Cartoonish,
        ArtStyle::Manga,
        ArtStyle::NewYorker,
        ArtStyle::Watercolor,
        ArtStyle::Minimalist,
        ArtStyle::PixelArt,
        ArtStyle::ComicBook,
    ];

    /// Short name used on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Self::Cartoonish => "cartoonish",
            Self::Manga => "manga",
            Self::NewYorker => "new-yorker",
            Self::Watercolor => "watercolor",
            Self::Minimalist => "minimalist",
            Self::PixelArt => "pixel-art",
            Self::ComicBook => "comic-book",
        }
    }
}

impl fmt::Display for ArtStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Cartoonish => "Cartoonish (fun and whimsical)",
            Self::Manga => "Manga (expressive characters)",
            Self::NewYorker => "New Yorker (clean line art)",
            Self::Watercolor => "Watercolor (soft and artistic)",
            Self::Minimalist => "Minimalist (simple and clean)",
            Self::PixelArt => "Pixel art (retro gaming style)",
            Self::ComicBook => "Comic book (superhero style)",
        };
        write!(f, "{label}")
    }
}

impl FromStr for ArtStyle {
    type Err = StoryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cartoonish" | "cartoon" => Ok(Self::Cartoonish),
            "manga" => Ok(Self::Manga),
            "new-yorker" | "new yorker" | "newyorker" => Ok(Self::NewYorker),
            "watercolor" => Ok(Self::Watercolor),
            "minimalist" | "minimal" => Ok(Self::Minimalist),
            "pixel-art" | "pixel art" | "pixel" => Ok(Self::PixelArt),
            "comic-book" | "comic book" | "comicbook" => Ok(Self::ComicBook),
            other => Err(StoryError::Config(format!("unknown art style: {other}"))),
        }
    }
}

/// Narrative tone for the generated story
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryTone {
    Funny,
    Heartwarming,
    SliceOfLife,
    Inspirational,
    Adventure,
    Dramatic,
}

impl StoryTone {
    /// All tones, in menu order
    pub const ALL: [StoryTone; 6] = [
        StoryTone::Funny,
        StoryTone::Heartwarming,
        StoryTone::SliceOfLife,
        StoryTone::Inspirational,
        StoryTone::Adventure,
        StoryTone::Dramatic,
    ];

    /// Short name used on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Self::Funny => "funny",
            Self::Heartwarming => "heartwarming",
            Self::SliceOfLife => "slice-of-life",
            Self::Inspirational => "inspirational",
            Self::Adventure => "adventure",
            Self::Dramatic => "dramatic",
        }
    }
}

impl fmt::Display for StoryTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Funny => "Funny (comedic moments)",
            Self::Heartwarming => "Heartwarming (touching emotions)",
            Self::SliceOfLife => "Slice-of-life (realistic daily life)",
            Self::Inspirational => "Inspirational (uplifting message)",
            Self::Adventure => "Adventure (exciting journey)",
            Self::Dramatic => "Dramatic (intense emotions)",
        };
        write!(f, "{label}")
    }
}

impl FromStr for StoryTone {
    type Err = StoryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "funny" => Ok(Self::Funny),
            "heartwarming" => Ok(Self::Heartwarming),
            "slice-of-life" | "slice of life" | "sliceoflife" => Ok(Self::SliceOfLife),
            "inspirational" => Ok(Self::Inspirational),
            "adventure" => Ok(Self::Adventure),
            "dramatic" => Ok(Self::Dramatic),
            other => Err(StoryError::Config(format!("unknown story tone: {other}"))),
        }
    }
}

/// Validated comic-generation preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub style: ArtStyle,
    pub tone: StoryTone,
    pub panels: u8,
}

impl Preferences {
    /// Creates preferences, validating the panel count
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Config` when `panels` is outside 1..=6.
    pub fn new(style: ArtStyle, tone: StoryTone, panels: u8) -> Result<Self> {
        if !(MIN_PANELS..=MAX_PANELS).contains(&panels) {
            return Err(StoryError::Config(format!(
                "panel count must be between {MIN_PANELS} and {MAX_PANELS}, got {panels}"
            ))
            .into());
        }
        Ok(Self {
            style,
            tone,
            panels,
        })
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            style: ArtStyle::Cartoonish,
            tone: StoryTone::SliceOfLife,
            panels: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_from_str() {
        assert_eq!("cartoonish".parse::<ArtStyle>().unwrap(), ArtStyle::Cartoonish);
        assert_eq!("Manga".parse::<ArtStyle>().unwrap(), ArtStyle::Manga);
        assert_eq!("new yorker".parse::<ArtStyle>().unwrap(), ArtStyle::NewYorker);
        assert_eq!("pixel-art".parse::<ArtStyle>().unwrap(), ArtStyle::PixelArt);
        assert!("oil painting".parse::<ArtStyle>().is_err());
    }

    #[test]
    fn test_tone_from_str() {
        assert_eq!("funny".parse::<StoryTone>().unwrap(), StoryTone::Funny);
        assert_eq!(
            "Slice-of-life".parse::<StoryTone>().unwrap(),
            StoryTone::SliceOfLife
        );
        assert!("noir".parse::<StoryTone>().is_err());
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(
            ArtStyle::Cartoonish.to_string(),
            "Cartoonish (fun and whimsical)"
        );
        assert_eq!(
            StoryTone::Inspirational.to_string(),
            "Inspirational (uplifting message)"
        );
    }

    #[test]
    fn test_key_round_trips() {
        for style in ArtStyle::ALL {
            assert_eq!(style.key().parse::<ArtStyle>().unwrap(), style);
        }
        for tone in StoryTone::ALL {
            assert_eq!(tone.key().parse::<StoryTone>().unwrap(), tone);
        }
    }

    #[test]
    fn test_panel_bounds() {
        assert!(Preferences::new(ArtStyle::Manga, StoryTone::Funny, 0).is_err());
        assert!(Preferences::new(ArtStyle::Manga, StoryTone::Funny, 7).is_err());
        assert!(Preferences::new(ArtStyle::Manga, StoryTone::Funny, 1).is_ok());
        assert!(Preferences::new(ArtStyle::Manga, StoryTone::Funny, 6).is_ok());
    }

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.style, ArtStyle::Cartoonish);
        assert_eq!(prefs.tone, StoryTone::SliceOfLife);
        assert_eq!(prefs.panels, 3);
    }
}
