//! One-shot search.

use anyhow::{bail, Result};
use reel_discovery::Movie;
use serde::Serialize;

use super::SearchArgs;
use crate::context::Context;

#[derive(Serialize)]
struct SearchReport<'a> {
    term: &'a str,
    total: usize,
    movies: &'a [Movie],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let page = ctx.page(&ctx.discovery())?;

    let spinner = if args.term.is_empty() {
        ctx.output.spinner("Loading popular movies")
    } else {
        ctx.output.spinner(&format!("Searching for \"{}\"", args.term))
    };
    page.fetch_movies(&args.term).await;
    spinner.finish_and_clear();

    let state = page.state();
    if ctx.output.is_json() {
        let shown = match args.limit {
            Some(limit) => &state.movie_list[..limit.min(state.movie_list.len())],
            None => &state.movie_list[..],
        };
        ctx.output.json(&SearchReport {
            term: &args.term,
            total: state.movie_list.len(),
            movies: shown,
            error: (!state.error_msg.is_empty()).then_some(state.error_msg.as_str()),
        });
    } else {
        ctx.output.results_section(&state, args.limit);
    }

    if !state.error_msg.is_empty() {
        bail!("search failed");
    }
    Ok(())
}
