//! Storystrip - comic journal CLI
//!
//! Main entry point for the Storystrip application.

use anyhow::Result;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storystrip::cli::Cli;
use storystrip::config::Config;
use storystrip::pipeline::{ArtStyle, Pipeline, Preferences, StoryTone};
use storystrip::providers::{FireworksClient, GroqProvider};
use storystrip::shell::Shell;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load and validate configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path)?;
    config.validate()?;

    // Default comic preferences from the command line
    let style: ArtStyle = cli.style.parse()?;
    let tone: StoryTone = cli.tone.parse()?;
    let defaults = Preferences::new(style, tone, cli.panels)?;

    // Build service clients and the pipeline
    let text = Arc::new(GroqProvider::new(config.text.clone())?);
    let image = FireworksClient::new(config.image.clone())?;
    let pipeline = Pipeline::new(text, image, config.session.clone());

    // Run the interactive shell
    let mut shell = Shell::new(pipeline, &config.session, defaults);
    shell.run().await
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "storystrip=debug"
    } else {
        "storystrip=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
