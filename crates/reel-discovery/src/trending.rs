//! Most-searched terms.

use std::sync::Arc;

use reel_store::{DocumentStore, Query};

use crate::config::DEFAULT_TRENDING_LIMIT;
use crate::{DiscoveryError, SearchCounter};

/// Reads the highest search counters.
#[derive(Clone)]
pub struct TrendingLoader {
    store: Arc<dyn DocumentStore>,
    collection: String,
    limit: usize,
}

impl TrendingLoader {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            limit: DEFAULT_TRENDING_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Counters ordered by count, highest first.
    pub async fn get_trending_movies(&self) -> Result<Vec<SearchCounter>, DiscoveryError> {
        let list = self
            .store
            .list_documents(
                &self.collection,
                &[Query::order_desc("count"), Query::limit(self.limit)],
            )
            .await?;
        Ok(list.decode()?)
    }
}
