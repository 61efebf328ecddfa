//! Most-searched terms.

use anyhow::{bail, Result};

use super::TrendingArgs;
use crate::context::Context;

/// Run the trending command.
pub async fn run(args: TrendingArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.discovery();
    if let Some(limit) = args.limit {
        config.search.trending_limit = limit;
    }
    let page = ctx.page(&config)?;

    let spinner = ctx.output.spinner("Loading trending searches");
    page.load_trending().await;
    spinner.finish_and_clear();

    let state = page.state();
    if !state.trending_error_msg.is_empty() {
        bail!("{}", state.trending_error_msg);
    }

    if ctx.output.is_json() {
        ctx.output.json(&state.trending_movies);
    } else if state.trending_movies.is_empty() {
        ctx.output.info("No searches recorded yet");
    } else {
        ctx.output.trending_section(&state);
    }
    Ok(())
}
