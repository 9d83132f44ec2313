//! The `dupmark` command line, exposed as a library.
//!
//! `main.rs` is the entry point. This crate holds the pieces other code
//! needs: the clap definitions ([`Cli`], [`Commands`]) for `xtask` to build
//! man pages and completions from via [`command()`], the [`commands`]
//! themselves for tests, and the MCP [`server`] when the `mcp` feature is on.

pub mod commands;

#[cfg(feature = "mcp")]
pub mod server;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

/// When to color output.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal that supports it.
    #[default]
    Auto,
    /// Color even when piped.
    Always,
    /// Never color.
    Never,
}

impl ColorChoice {
    const fn forced(self) -> Option<bool> {
        match self {
            Self::Auto => None,
            Self::Always => Some(true),
            Self::Never => Some(false),
        }
    }

    /// Install this choice as the process-wide owo-colors override.
    pub fn apply(self) {
        if let Some(on) = self.forced() {
            owo_colors::set_override(on);
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                 Log filter (e.g., debug, dupmark=trace)
    DUPMARK_LOG_PATH         Write logs to this file
    DUPMARK_LOG_DIR          Write daily log files to this directory
    DUPMARK_HIGHLIGHT_COLOR  Highlight color (#rrggbb)
    DUPMARK_MAX_INPUT_BYTES  Largest input accepted, in bytes
";

/// Highlight repeated words in text.
#[derive(Parser)]
#[command(name = "dupmark", version, about, long_about = None)]
#[command(arg_required_else_help = true, after_long_help = ENV_HELP)]
pub struct Cli {
    /// What to do.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print just the version number
    #[arg(long)]
    pub version_only: bool,

    /// Read configuration from FILE as well as the discovered files
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Change to DIR before doing anything else
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub chdir: Option<PathBuf>,

    /// Log errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// When to color output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print text with every repeated word highlighted
    Mark(commands::mark::MarkArgs),

    /// List the character ranges that would be highlighted
    Ranges(commands::ranges::RangesArgs),

    /// Exit with an error if any word repeats
    Check(commands::check::CheckArgs),

    /// Show version and effective configuration
    Info(commands::info::InfoArgs),

    /// Serve duplicate detection over MCP on stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

/// The clap command tree, for man page and completion generation.
pub fn command() -> clap::Command {
    Cli::command()
}
