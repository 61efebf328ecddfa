//! Reel CLI - find movies from the terminal.
//!
//! Commands:
//! - `reel search` - Search the catalog (popular movies when no term is given)
//! - `reel trending` - Show the most-searched terms
//! - `reel browse` - Interactive debounced search
//! - `reel config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{BrowseArgs, ConfigArgs, SearchArgs, TrendingArgs};

/// Reel - Find movies you'll enjoy without the hassle
#[derive(Parser)]
#[command(name = "reel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for movies
    Search(SearchArgs),

    /// Show trending searches
    Trending(TrendingArgs),

    /// Browse interactively, one search-box value per line
    Browse(BrowseArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let logging = ctx
        .config
        .logging_for(cli.verbose, cli.json, console::colors_enabled_stderr());
    if let Err(e) = reel_observability::init(&logging) {
        ctx.output.debug(&e.to_string());
    }

    let result = match cli.command {
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Trending(args) => commands::trending::run(args, &ctx).await,
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
