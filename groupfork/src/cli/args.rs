//! CLI argument definitions.

use clap::{ArgAction, Parser};

use crate::config::{DEFAULT_URL, TOKEN_ENV};

/// Groupfork - fork an entire GitLab group tree into a new namespace
#[derive(Parser, Debug)]
#[command(name = "groupfork")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source namespace to copy (group path or id)
    #[arg(value_name = "SOURCE_NAMESPACE")]
    pub source: String,

    /// Destination namespace to create (top-level group name)
    #[arg(value_name = "DESTINATION_NAMESPACE")]
    pub destination: String,

    /// Base URL of the GitLab instance
    #[arg(short, long, default_value = DEFAULT_URL)]
    pub url: String,

    /// API token
    #[arg(short, long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    // === Fork Options ===
    /// Maximum number of fork requests in flight
    #[arg(short = 'j', long, default_value_t = 1)]
    pub concurrency: usize,

    /// Keep forking after a failed fork and report failures at the end
    #[arg(long)]
    pub continue_on_error: bool,

    /// Timeout in seconds for each API request
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    // === Output Options ===
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
