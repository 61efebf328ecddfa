//! In-process document store.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::query::evaluate;
use crate::{Document, DocumentId, DocumentList, DocumentStore, Query, StoreError};

/// Document store held in memory. Used offline and in tests.
///
/// Documents keep insertion order within a collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Fetch a document by id.
    pub async fn get(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned())
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, false)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(
        &self,
        collection: &str,
        queries: &[Query],
    ) -> Result<DocumentList, StoreError> {
        let collections = self.collections.read().await;
        let docs = collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);
        Ok(evaluate(queries, docs.iter()))
    }

    async fn create_document(
        &self,
        collection: &str,
        id: DocumentId,
        data: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let id = match id {
            DocumentId::Unique => DocumentId::generate(),
            DocumentId::Custom(id) => id,
        };
        if docs.iter().any(|d| d.id == id) {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id,
            });
        }

        let stamp = now();
        let doc = Document {
            id,
            created_at: Some(stamp.clone()),
            updated_at: Some(stamp),
            data,
        };
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        doc.data.extend(data);
        doc.updated_at = Some(now());
        Ok(doc.clone())
    }
}
