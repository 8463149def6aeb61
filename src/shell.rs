//! Interactive shell
//!
//! readline-based loop over a single session. Plain input becomes a chat
//! turn; slash commands drive comic generation, regeneration, export,
//! and session management.

use crate::config::SessionConfig;
use crate::error::Result;
use crate::pipeline::{ArtStyle, Pipeline, Preferences, ProgressSink, StoryTone};
use crate::session::Session;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write as _;

/// Parsed shell command
#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    /// Generate a comic, with optional style/tone/panel overrides
    Comic {
        style: Option<String>,
        tone: Option<String>,
        panels: Option<String>,
    },
    /// Regenerate the last comic
    Regen,
    /// Export the conversation to a text file
    Export { path: Option<String> },
    /// Clear the conversation and stored comic
    Clear,
    /// Show session status
    Status,
    /// List available styles and tones
    Styles,
    /// Show help
    Help,
    /// Exit the shell
    Quit,
    /// Unrecognized slash command
    Unknown(String),
}

/// Parses a line into a shell command, or None for plain chat input
fn parse_command(line: &str) -> Option<ShellCommand> {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return Some(ShellCommand::Quit);
    }
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default();
    match command {
        "/comic" => Some(ShellCommand::Comic {
            style: parts.next().map(str::to_string),
            tone: parts.next().map(str::to_string),
            panels: parts.next().map(str::to_string),
        }),
        "/regen" => Some(ShellCommand::Regen),
        "/export" => Some(ShellCommand::Export {
            path: parts.next().map(str::to_string),
        }),
        "/clear" => Some(ShellCommand::Clear),
        "/status" => Some(ShellCommand::Status),
        "/styles" => Some(ShellCommand::Styles),
        "/help" => Some(ShellCommand::Help),
        "/quit" => Some(ShellCommand::Quit),
        other => Some(ShellCommand::Unknown(other.to_string())),
    }
}

/// Progress sink that paints stage and poll updates on the terminal
struct ShellProgress;

impl ProgressSink for ShellProgress {
    fn stage(&self, percent: u8, label: &str) {
        println!("{} {}", format!("[{percent:>3}%]").cyan(), label);
    }

    fn poll_attempt(&self, attempt: u32, max_attempts: u32) {
        // Overwrite the same line rather than scrolling sixty updates past
        print!("\r      Generating image... ({attempt}/{max_attempts})");
        let _ = std::io::stdout().flush();
        if attempt == max_attempts {
            println!();
        }
    }
}

/// Interactive shell over a pipeline and one session
pub struct Shell {
    pipeline: Pipeline,
    session: Session,
    defaults: Preferences,
    min_comic_turns: usize,
}

impl Shell {
    /// Create a new shell
    pub fn new(pipeline: Pipeline, session_config: &SessionConfig, defaults: Preferences) -> Self {
        Self {
            pipeline,
            session: Session::new(session_config),
            defaults,
            min_comic_turns: session_config.min_comic_turns,
        }
    }

    /// Run the interactive loop until the user quits
    ///
    /// # Errors
    ///
    /// Returns error if the readline editor cannot be initialized.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Starting interactive shell");
        let mut rl = DefaultEditor::new()?;
        print_welcome_banner(self.min_comic_turns);

        loop {
            match rl.readline(&"journal> ".green().to_string()) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    match parse_command(trimmed) {
                        Some(ShellCommand::Quit) => break,
                        Some(command) => self.dispatch(command).await,
                        None => self.chat(trimmed).await,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn dispatch(&mut self, command: ShellCommand) {
        match command {
            ShellCommand::Comic {
                style,
                tone,
                panels,
            } => self.comic(style, tone, panels).await,
            ShellCommand::Regen => self.regen().await,
            ShellCommand::Export { path } => self.export(path),
            ShellCommand::Clear => {
                self.session.clear();
                println!("Conversation cleared.\n");
            }
            ShellCommand::Status => self.status(),
            ShellCommand::Styles => print_styles(),
            ShellCommand::Help => print_help(),
            ShellCommand::Unknown(command) => {
                eprintln!(
                    "{} Unknown command: {command}. Type '/help' for a list.\n",
                    "!".yellow()
                );
            }
            ShellCommand::Quit => {}
        }
    }

    async fn chat(&mut self, message: &str) {
        match self.pipeline.handle_chat_turn(&mut self.session, message).await {
            Ok(reply) => println!("\n{}\n", reply),
            Err(e) => eprintln!("{} {}\n", "Error:".red(), e),
        }
    }

    async fn comic(&mut self, style: Option<String>, tone: Option<String>, panels: Option<String>) {
        let prefs = match self.resolve_preferences(style, tone, panels) {
            Ok(prefs) => prefs,
            Err(e) => {
                eprintln!("{} {}\n", "Error:".red(), e);
                return;
            }
        };

        println!(
            "\nGenerating a {}-panel comic ({}, {})...\n",
            prefs.panels, prefs.style, prefs.tone
        );

        match self
            .pipeline
            .generate_comic(&mut self.session, &prefs, &ShellProgress)
            .await
        {
            Ok(artifacts) => {
                println!("\n{}\n", "Your comic strip is ready!".green().bold());
                println!("{}", "Story:".bold());
                println!("{}\n", artifacts.story);
                println!("{}", "Visual prompt:".bold());
                println!("{}\n", artifacts.visual_prompt);
                println!("{}", "Image:".bold());
                println!("{}\n", artifacts.image.reference());
            }
            Err(e) => eprintln!("\n{} {}\n", "Error:".red(), e),
        }
    }

    async fn regen(&mut self) {
        println!("\nGenerating an alternative rendition...\n");
        match self
            .pipeline
            .regenerate(&mut self.session, &ShellProgress)
            .await
        {
            Ok(image) => {
                println!("\n{}", "Here is another take:".green().bold());
                println!("{}\n", image.reference());
            }
            Err(e) => eprintln!("\n{} {}\n", "Error:".red(), e),
        }
    }

    fn export(&self, path: Option<String>) {
        if self.session.conversation.is_empty() {
            eprintln!("{} Nothing to export yet.\n", "!".yellow());
            return;
        }
        let path = path.unwrap_or_else(default_export_path);
        match std::fs::write(&path, self.session.conversation.export()) {
            Ok(()) => println!("Conversation saved to {}\n", path.bold()),
            Err(e) => eprintln!("{} {}\n", "Error:".red(), e),
        }
    }

    fn status(&self) {
        println!("\n{}", "Session status".bold());
        println!("  Messages:      {}", self.session.conversation.len());
        println!(
            "  Comic ready:   {}",
            if self.session.conversation.len() >= self.min_comic_turns {
                "yes".green().to_string()
            } else {
                format!(
                    "after {} more messages",
                    self.min_comic_turns - self.session.conversation.len()
                )
            }
        );
        if let Some(story) = self.session.last_story() {
            println!("  Last story:    {}", story);
        }
        println!(
            "  Last comic:    {}",
            match self.session.last_image() {
                Some(image) if image.is_url() => image.reference().to_string(),
                Some(_) => "inline image".to_string(),
                None => "none".to_string(),
            }
        );
        println!("  Default style: {}", self.defaults.style);
        println!("  Default tone:  {}", self.defaults.tone);
        println!("  Panels:        {}\n", self.defaults.panels);
    }

    fn resolve_preferences(
        &self,
        style: Option<String>,
        tone: Option<String>,
        panels: Option<String>,
    ) -> Result<Preferences> {
        let style = match style {
            Some(s) => s.parse::<ArtStyle>()?,
            None => self.defaults.style,
        };
        let tone = match tone {
            Some(t) => t.parse::<StoryTone>()?,
            None => self.defaults.tone,
        };
        let panels = match panels {
            Some(p) => p.parse::<u8>().map_err(|_| {
                crate::error::StoryError::Config(format!("invalid panel count: {p}"))
            })?,
            None => self.defaults.panels,
        };
        Preferences::new(style, tone, panels)
    }
}

fn default_export_path() -> String {
    format!(
        "storystrip_{}.txt",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

fn print_welcome_banner(min_comic_turns: usize) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║            Storystrip - your comic journal                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Tell me about your day. After {min_comic_turns} messages, '/comic' turns the");
    println!("conversation into a comic strip.\n");
    println!("Type '/help' for available commands, 'exit' to quit\n");
}

fn print_help() {
    println!("\n{}", "Commands".bold());
    println!("  /comic [style] [tone] [panels]  Generate a comic from the conversation");
    println!("  /regen                          Alternative rendition of the last comic");
    println!("  /export [path]                  Save the conversation to a text file");
    println!("  /styles                         List available styles and tones");
    println!("  /status                         Show session status");
    println!("  /clear                          Start over");
    println!("  /help                           Show this help");
    println!("  /quit                           Exit\n");
    println!("Anything else is a journal message.\n");
}

fn print_styles() {
    println!("\n{}", "Art styles".bold());
    for style in ArtStyle::ALL {
        println!("  {:<12} {}", style.key(), style);
    }
    println!("\n{}", "Story tones".bold());
    for tone in StoryTone::ALL {
        println!("  {:<14} {}", tone.key(), tone);
    }
    println!();
}
