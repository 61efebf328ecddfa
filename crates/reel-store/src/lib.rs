//! Document store client for Reel search analytics.
//!
//! The [`DocumentStore`] trait exposes the three operations the analytics
//! layer needs (list with queries, create, update). Two backends:
//! [`AppwriteStore`] for the hosted service and [`MemoryStore`] for offline
//! runs and tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use reel_store::{DocumentStore, MemoryStore, Query};
//!
//! let store = MemoryStore::new();
//! let top = store
//!     .list_documents("metrics", &[Query::order_desc("count"), Query::limit(5)])
//!     .await?;
//! ```

mod appwrite;
mod document;
mod error;
mod memory;
mod query;
mod store;

pub use appwrite::{AppwriteConfig, AppwriteStore};
pub use document::{Document, DocumentId, DocumentList};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use query::Query;
pub use store::DocumentStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Document, DocumentId, DocumentList, DocumentStore, Query, StoreError};
}
