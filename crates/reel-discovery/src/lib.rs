//! Movie discovery for Reel.
//!
//! A search box feeds a [`Debouncer`]; each committed term is looked up in the
//! movie catalog by [`MoviePage::fetch_movies`], successful searches are
//! counted by the [`AnalyticsRecorder`], and the most-searched terms are read
//! back by the [`TrendingLoader`]. Everything the page shows lives in
//! [`PageState`], published through a `watch` channel.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use reel_discovery::{DiscoveryConfig, MoviePage};
//!
//! let page = Arc::new(MoviePage::from_config(&DiscoveryConfig::from_env())?);
//! page.mount().await;
//!
//! let (keys, input) = tokio::sync::mpsc::channel(16);
//! tokio::spawn(Arc::clone(&page).run(input));
//! keys.send("batman".to_string()).await?;
//! ```

mod analytics;
mod catalog;
pub mod config;
mod debounce;
mod error;
mod movie;
mod page;
mod state;
mod trending;

pub use analytics::{AnalyticsRecorder, RecordOutcome, SearchCounter};
pub use catalog::{CatalogClient, CatalogQuery};
pub use config::{CatalogConfig, DiscoveryConfig, SearchConfig, StoreBackend, StoreConfig};
pub use debounce::Debouncer;
pub use error::{ConfigError, DiscoveryError};
pub use movie::{CatalogPage, Movie, NO_POSTER, POSTER_BASE_URL};
pub use page::MoviePage;
pub use state::{PageState, ResultsView, SEARCH_ERROR_MESSAGE, TRENDING_ERROR_MESSAGE};
pub use trending::TrendingLoader;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        DiscoveryConfig, DiscoveryError, Movie, MoviePage, PageState, ResultsView, SearchCounter,
    };
}
