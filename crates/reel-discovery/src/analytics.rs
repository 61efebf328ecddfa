//! Per-term search counters.

use std::sync::Arc;

use reel_store::{DocumentId, DocumentStore, Query};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{DiscoveryError, Movie};

/// Counter document for one search term, with the top result attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCounter {
    /// Document id, stable across increments.
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: u64,
    #[serde(default)]
    pub movie_id: Option<u64>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// What [`AnalyticsRecorder::update_search_count`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// First search of the term; a counter was created with count 1.
    Created(SearchCounter),
    /// The existing counter was bumped.
    Incremented(SearchCounter),
}

impl RecordOutcome {
    pub fn counter(&self) -> &SearchCounter {
        match self {
            RecordOutcome::Created(c) | RecordOutcome::Incremented(c) => c,
        }
    }
}

/// Records successful searches into a counter collection.
#[derive(Clone)]
pub struct AnalyticsRecorder {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl AnalyticsRecorder {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Create or increment the counter for `term`.
    ///
    /// The term is matched exactly. The increment is a read followed by a
    /// write, so two concurrent searches for the same term can both read the
    /// same count and one increment is lost.
    pub async fn update_search_count(
        &self,
        term: &str,
        movie: &Movie,
    ) -> Result<RecordOutcome, DiscoveryError> {
        let existing = self
            .store
            .list_documents(&self.collection, &[Query::equal("searchTerm", term)])
            .await?;

        if let Some(doc) = existing.documents.first() {
            let current: SearchCounter = doc.decode()?;
            let mut data = Map::new();
            data.insert("count".to_string(), json!(current.count + 1));

            let updated = self
                .store
                .update_document(&self.collection, &doc.id, data)
                .await?;
            let counter: SearchCounter = updated.decode()?;
            tracing::info!(term, count = counter.count, "search count incremented");
            return Ok(RecordOutcome::Incremented(counter));
        }

        let mut data = Map::new();
        data.insert("searchTerm".to_string(), Value::from(term));
        data.insert("count".to_string(), json!(1));
        data.insert("movie_id".to_string(), json!(movie.id));
        data.insert("poster_url".to_string(), Value::from(movie.poster_url()));
        data.insert("title".to_string(), Value::from(movie.title.as_str()));

        let created = self
            .store
            .create_document(&self.collection, DocumentId::Unique, data)
            .await?;
        let counter: SearchCounter = created.decode()?;
        tracing::info!(term, id = %counter.id, "search counter created");
        Ok(RecordOutcome::Created(counter))
    }
}
