//! Interactive browsing.
//!
//! Every stdin line is the current contents of the search box. Lines are
//! debounced, so typing several quickly only searches the last one.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use indicatif::ProgressBar;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::BrowseArgs;
use crate::context::Context;

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.discovery();
    if let Some(ms) = args.debounce_ms {
        config.search.debounce_ms = ms;
    }
    let page = Arc::new(ctx.page(&config)?);

    ctx.output.header("Find Movies You'll Enjoy Without the Hassle");
    let spinner = ctx.output.spinner("Loading");
    page.mount().await;
    spinner.finish_and_clear();

    let state = page.state();
    ctx.output.trending_section(&state);
    ctx.output.results_section(&state, Some(args.limit));
    ctx.output.info(&format!(
        "Type to search ({}ms debounce). Ctrl-D to quit.",
        config.search.debounce_ms
    ));

    let mut updates = page.subscribe();
    let output = ctx.output.clone();
    let limit = args.limit;
    let renderer = tokio::spawn(async move {
        let mut shown = updates.borrow_and_update().active_request;
        let mut spinner: Option<ProgressBar> = None;

        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.is_loading {
                if spinner.is_none() {
                    let pb = output.spinner(&format!("Searching \"{}\"", state.search_term));
                    spinner = Some(pb);
                }
                continue;
            }
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
            if state.active_request != shown {
                shown = state.active_request;
                output.results_section(&state, Some(limit));
            }
        }
        if let Some(pb) = spinner.take() {
            pb.finish_and_clear();
        }
    });

    let (keys, input) = mpsc::channel(16);
    let runner = tokio::spawn(Arc::clone(&page).run(input));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        if keys.send(line.trim_end().to_string()).await.is_err() {
            break;
        }
    }
    drop(keys);

    runner.await.context("Search loop failed")?;
    // The renderer stops once the page, and with it the state sender, is gone.
    drop(page);
    if tokio::time::timeout(Duration::from_secs(1), renderer).await.is_err() {
        tracing::debug!("renderer did not stop in time");
    }
    Ok(())
}
