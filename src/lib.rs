//! Local Object Cache - a persistent, time-expiring object cache
//!
//! Stores typed items in named collections inside an embedded document
//! store and lazily evicts items older than the configured validity window.

pub mod cache;
pub mod config;
pub mod error;
pub mod store;

pub use cache::{Cache, Cacheable, IndexSpec};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
