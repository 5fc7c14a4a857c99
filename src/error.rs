//! Error types for the object cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the object cache.
///
/// Every failure from the storage engine propagates unchanged; the cache
/// performs no retries and no silent recovery.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store could not be opened or a store operation failed
    #[error("storage engine error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// An item could not be mapped to a document, or a document back to an item
    #[error("document mapping error: {0}")]
    Mapping(#[from] serde_json::Error),

    /// A stored document carries an identifier that cannot be decoded
    #[error("malformed document identifier: {0}")]
    MalformedId(String),

    /// The cache instance was disposed and its store handle released
    #[error("cache instance has been disposed")]
    Disposed,
}

// == Result Type Alias ==
/// Convenience Result type for the object cache.
pub type Result<T> = std::result::Result<T, CacheError>;
