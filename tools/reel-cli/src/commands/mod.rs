//! CLI command implementations.

pub mod browse;
pub mod config;
pub mod search;
pub mod trending;

use clap::{Args, Subcommand};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search term. Lists popular movies when omitted.
    #[arg(default_value = "")]
    pub term: String,

    /// Show at most this many results.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the trending command.
#[derive(Args)]
pub struct TrendingArgs {
    /// Number of entries (default: search.trending_limit).
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Quiet period before a typed value is searched, in milliseconds.
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Show at most this many results per search.
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show effective configuration (file plus environment).
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,

        /// Write the commented template without prompting.
        #[arg(long)]
        defaults: bool,
    },
    /// Validate the effective configuration.
    Validate,
}
