//! Output formatting for the CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use reel_discovery::{Movie, PageState, ResultsView, SearchCounter};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(spinner_style);
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print a numbered movie list.
    pub fn movies(&self, movies: &[Movie], limit: Option<usize>) {
        if self.json {
            return;
        }
        for (i, movie) in movies.iter().take(limit.unwrap_or(usize::MAX)).enumerate() {
            println!("{}", movie_line(i + 1, movie));
            if self.verbose {
                println!("      {}", style(movie.poster_url()).dim());
            }
        }
        if let Some(limit) = limit {
            if movies.len() > limit {
                println!("  {}", style(format!("… and {} more", movies.len() - limit)).dim());
            }
        }
    }

    /// Print the trending list.
    pub fn trending(&self, counters: &[SearchCounter]) {
        if self.json {
            return;
        }
        for (i, counter) in counters.iter().enumerate() {
            println!("{}", trending_line(i + 1, counter));
        }
    }

    /// Print the trending section, if there is one to show.
    pub fn trending_section(&self, state: &PageState) {
        if self.json || !state.show_trending() {
            return;
        }
        self.header("Trending Movies");
        if state.trending_error_msg.is_empty() {
            self.trending(&state.trending_movies);
        } else {
            self.error(&state.trending_error_msg);
        }
    }

    /// Print the results section.
    pub fn results_section(&self, state: &PageState, limit: Option<usize>) {
        if self.json {
            return;
        }
        if state.search_term.is_empty() {
            self.header("All Movies");
        } else {
            self.header(&format!("Results for \"{}\"", state.search_term));
        }
        match state.results_view() {
            ResultsView::Loading => self.info("Loading…"),
            ResultsView::Error(msg) => self.error(msg),
            ResultsView::Movies([]) => self.info("No movies found"),
            ResultsView::Movies(movies) => self.movies(movies, limit),
        }
    }
}

/// One movie card: title, rating, language and year.
pub fn movie_line(position: usize, movie: &Movie) -> String {
    let title = if movie.title.is_empty() {
        "(untitled)"
    } else {
        movie.title.as_str()
    };
    format!(
        "  {} {}  {}",
        style(format!("{:>2}.", position)).dim(),
        style(title).bold(),
        style(format!(
            "★ {} • {} • {}",
            movie.rating(),
            movie.language(),
            movie.year()
        ))
        .dim()
    )
}

/// One trending entry: rank, term and count.
pub fn trending_line(rank: usize, counter: &SearchCounter) -> String {
    let title = counter.title.as_deref().unwrap_or(&counter.search_term);
    format!(
        "  {} {}  {}",
        style(format!("{:>2}.", rank)).cyan().bold(),
        title,
        style(format!(
            "\"{}\" searched {}×",
            counter.search_term, counter.count
        ))
        .dim()
    )
}
