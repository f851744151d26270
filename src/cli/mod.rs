//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub mod commands;
pub mod output;
pub mod progress;
pub mod prompt;

pub use commands::Commands;
pub use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "skm",
    version,
    about = "Install and manage skills, MCP servers and plugins for Claude",
    propagate_version = true
)]
pub struct Cli {
    /// Without a subcommand, skm opens the interactive menu.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Machine-readable JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress logs and spinners
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (defaults to $SKM_CONFIG, then ~/.config/skm/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub const fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}
