//! Movie catalog client.

use reel_data::FetchClient;

use crate::{CatalogPage, DiscoveryError, Movie};

/// Which catalog listing a query maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogQuery<'a> {
    /// Popular movies, used when nothing has been typed.
    Discover,
    /// Free-text title search.
    Search(&'a str),
}

impl<'a> CatalogQuery<'a> {
    pub fn for_term(term: &'a str) -> Self {
        if term.is_empty() {
            CatalogQuery::Discover
        } else {
            CatalogQuery::Search(term)
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            CatalogQuery::Discover => "/discover/movie",
            CatalogQuery::Search(_) => "/search/movie",
        }
    }
}

/// Client for the catalog's discover and search listings.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: FetchClient,
    api_key: String,
}

impl CatalogClient {
    /// `client` should carry any transport or timeout settings; the base URL
    /// is applied here.
    pub fn new(client: FetchClient, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: client.with_base_url(base_url),
            api_key: api_key.into(),
        }
    }

    /// Fetch the first page of results for `term`.
    ///
    /// An empty term lists popular movies; anything else is searched as-is.
    pub async fn fetch(&self, term: &str) -> Result<Vec<Movie>, DiscoveryError> {
        let query = CatalogQuery::for_term(term);
        let mut request = self
            .client
            .get(query.path())
            .bearer_auth(&self.api_key)
            .accept("application/json");
        request = match query {
            CatalogQuery::Discover => request.query("sort_by", "popularity.desc"),
            CatalogQuery::Search(text) => request.query("query", text),
        };

        let page: CatalogPage = request.send().await?.error_for_status()?.json()?;
        if page.is_failure() {
            return Err(DiscoveryError::CatalogFailure(
                page.failure_message().to_string(),
            ));
        }

        let movies = page.into_results();
        tracing::debug!(term, count = movies.len(), "catalog results");
        Ok(movies)
    }
}
