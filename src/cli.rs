//! Command-line interface definition for Storystrip
//!
//! This module defines the CLI structure using clap's derive API. The
//! binary has a single mode, the interactive journal shell, so there are
//! no subcommands; flags set the config path and default comic
//! preferences.

use clap::Parser;

/// Storystrip - comic journal CLI
///
/// Chat about your day, then turn the conversation into a comic strip
/// through hosted text and image generation services.
#[derive(Parser, Debug, Clone)]
#[command(name = "storystrip")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Default art style for generated comics
    #[arg(long, default_value = "cartoonish")]
    pub style: String,

    /// Default story tone for generated comics
    #[arg(long, default_value = "slice-of-life")]
    pub tone: String,

    /// Default number of comic panels (1-6)
    #[arg(long, default_value_t = 3)]
    pub panels: u8,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            style: "cartoonish".to_string(),
            tone: "slice-of-life".to_string(),
            panels: 3,
        }
    }
}
