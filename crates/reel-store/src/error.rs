//! Store error types.

use thiserror::Error;

/// Errors that can occur when talking to the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or rejected the request.
    #[error("Store request failed: {0}")]
    Request(#[from] reel_data::FetchError),

    /// Failed to (de)serialize a document.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Document not found.
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// A document with this id already exists.
    #[error("Document already exists: {collection}/{id}")]
    Conflict { collection: String, id: String },
}
