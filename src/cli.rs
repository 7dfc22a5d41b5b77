// Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Terminal client for YouTrack.
///
/// Lists your issues, shows one issue, and books time on it with an
/// interactive stopwatch (Ctrl+X stops, Ctrl+C cancels).
#[derive(Debug, Parser)]
#[command(name = "yt", version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to an extra config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List issues assigned to YOUTRACK_USER.
    #[command(visible_alias = "l")]
    List,

    /// Show a single issue.
    Issue {
        /// Issue id such as CLI-42. Defaults to the id in the current git branch name.
        id: Option<String>,

        /// Start the stopwatch and book the tracked time on the issue.
        #[arg(short, long)]
        time: bool,
    },
}
