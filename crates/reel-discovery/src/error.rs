//! Discovery error types.

use reel_data::FetchError;
use reel_store::StoreError;
use thiserror::Error;

/// Errors from the catalog, the analytics store, or setup.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The catalog could not be reached or answered with a non-2xx status.
    #[error("Catalog request failed: {0}")]
    Catalog(#[from] FetchError),

    /// The catalog answered 2xx but flagged the request as failed.
    #[error("Catalog reported failure: {0}")]
    CatalogFailure(String),

    /// Reading or writing search counters failed.
    #[error("Analytics store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Invalid or incomplete configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required setting has no value.
    #[error("Missing setting: {0}")]
    Missing(&'static str),

    /// A setting has a value that cannot be used.
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}
