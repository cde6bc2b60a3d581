//! CLI entry point for Skiff.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Skiff agent CLI
#[derive(Parser, Debug)]
#[command(name = "skiff", version, about = "Skiff agent runtime CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive conversation with an agent
    Chat(ChatArgs),
    /// One-shot question, print the reply
    Ask(AskArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Agent directory (config.yaml, .env)
    #[arg(short, long, default_value = ".")]
    pub config_dir: PathBuf,

    /// System prompt override
    #[arg(short, long)]
    pub system: Option<String>,

    /// Model override
    #[arg(short, long)]
    pub model: Option<String>,

    /// SDK binary (overrides SKIFF_SDK_BIN)
    #[arg(long)]
    pub sdk_bin: Option<PathBuf>,
}

/// Arguments for the `ask` subcommand.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Agent directory (config.yaml, .env)
    #[arg(short, long, default_value = ".")]
    pub config_dir: PathBuf,

    /// SDK binary (overrides SKIFF_SDK_BIN)
    #[arg(long)]
    pub sdk_bin: Option<PathBuf>,

    /// Prompt to send
    pub prompt: String,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
