//! Page state and its transitions.
//!
//! All mutation goes through the methods here. Search transitions carry the
//! request id returned by [`PageState::begin_search`]; a transition for any
//! id other than the newest one is ignored, so a slow response can never
//! overwrite a newer one.

use crate::{Movie, SearchCounter};

pub const SEARCH_ERROR_MESSAGE: &str = "Error fetching movies. Please try again later.";
pub const TRENDING_ERROR_MESSAGE: &str = "Error fetching trending movies. Please try again later.";

/// Everything the discovery page renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    /// Results of the newest completed search.
    pub movie_list: Vec<Movie>,
    pub trending_movies: Vec<SearchCounter>,
    pub is_loading: bool,
    /// Empty when the newest search succeeded.
    pub error_msg: String,
    pub trending_error_msg: String,
    /// Term of the newest search.
    pub search_term: String,
    /// Id of the newest search, 0 before the first one.
    pub active_request: u64,
}

/// What the results section shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultsView<'a> {
    Loading,
    Error(&'a str),
    Movies(&'a [Movie]),
}

impl PageState {
    /// Start a search, returning its request id.
    pub fn begin_search(&mut self, term: &str) -> u64 {
        self.active_request += 1;
        self.is_loading = true;
        self.error_msg.clear();
        self.search_term = term.to_string();
        self.active_request
    }

    fn is_current(&self, request: u64) -> bool {
        request == self.active_request
    }

    /// Replace the result list. Returns false for a stale request.
    pub fn apply_results(&mut self, request: u64, movies: Vec<Movie>) -> bool {
        if !self.is_current(request) {
            return false;
        }
        self.movie_list = movies;
        self.error_msg.clear();
        true
    }

    /// Clear results and show the search error. Returns false for a stale request.
    pub fn apply_failure(&mut self, request: u64) -> bool {
        if !self.is_current(request) {
            return false;
        }
        self.movie_list.clear();
        self.error_msg = SEARCH_ERROR_MESSAGE.to_string();
        true
    }

    /// End a search. Only the newest request may clear the loading flag.
    pub fn finish_search(&mut self, request: u64) -> bool {
        if !self.is_current(request) {
            return false;
        }
        self.is_loading = false;
        true
    }

    pub fn apply_trending(&mut self, counters: Vec<SearchCounter>) {
        self.trending_movies = counters;
        self.trending_error_msg.clear();
    }

    pub fn apply_trending_failure(&mut self) {
        self.trending_error_msg = TRENDING_ERROR_MESSAGE.to_string();
    }

    /// The trending section is shown when there is something to list or an
    /// error to report.
    pub fn show_trending(&self) -> bool {
        !self.trending_movies.is_empty() || !self.trending_error_msg.is_empty()
    }

    pub fn results_view(&self) -> ResultsView<'_> {
        if self.is_loading {
            ResultsView::Loading
        } else if !self.error_msg.is_empty() {
            ResultsView::Error(&self.error_msg)
        } else {
            ResultsView::Movies(&self.movie_list)
        }
    }
}
