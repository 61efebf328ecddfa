//! The document store seam.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{Document, DocumentId, DocumentList, Query, StoreError};

/// Query, create and update over schemaless documents grouped in collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents matching `queries`.
    async fn list_documents(
        &self,
        collection: &str,
        queries: &[Query],
    ) -> Result<DocumentList, StoreError>;

    /// Create a document with the given attributes.
    async fn create_document(
        &self,
        collection: &str,
        id: DocumentId,
        data: Map<String, Value>,
    ) -> Result<Document, StoreError>;

    /// Overwrite the given attributes of an existing document.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, StoreError>;
}
