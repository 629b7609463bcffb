//! CLI argument parsing for habitchallenge

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hc")]
#[command(author, version, about = "Group habit challenges with a daily progress ledger", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Override the challenge store directory
    #[arg(long)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format for read commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new challenge
    Create {
        /// Display name
        #[arg(required = true)]
        name: String,

        /// First day (YYYY-MM-DD, default: today in the platform timezone)
        #[arg(short, long)]
        start: Option<String>,

        /// Length in days (7-365)
        #[arg(short, long, default_value = "7")]
        days: u32,

        /// Initial participants (repeatable)
        #[arg(short, long = "participant")]
        participants: Vec<String>,
    },

    /// Add a participant to a challenge
    Join {
        /// Challenge ID
        #[arg(required = true)]
        challenge_id: String,

        /// User ID
        #[arg(required = true)]
        user_id: String,
    },

    /// Remove a participant and their history
    Leave {
        /// Challenge ID
        #[arg(required = true)]
        challenge_id: String,

        /// User ID
        #[arg(required = true)]
        user_id: String,
    },

    /// Record a participant's completion percentage for a day
    Record {
        /// Challenge ID
        #[arg(required = true)]
        challenge_id: String,

        /// User ID
        #[arg(required = true)]
        user_id: String,

        /// Completion percentage (0-100)
        #[arg(required = true, allow_negative_numbers = true)]
        pct: f64,

        /// Day to record (YYYY-MM-DD, default: today in the platform timezone)
        #[arg(short, long)]
        day: Option<String>,
    },

    /// Extend a challenge by some days
    Extend {
        /// Challenge ID
        #[arg(required = true)]
        challenge_id: String,

        /// Days to add
        #[arg(required = true)]
        days: u32,
    },

    /// Show a challenge with every participant's average
    Show {
        /// Challenge ID
        #[arg(required = true)]
        challenge_id: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the current leader of a challenge
    Winner {
        /// Challenge ID
        #[arg(required = true)]
        challenge_id: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List all challenges
    List {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Delete a challenge
    Delete {
        /// Challenge ID
        #[arg(required = true)]
        challenge_id: String,
    },
}
