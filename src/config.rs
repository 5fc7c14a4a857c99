//! Configuration Module
//!
//! Construction parameters for a cache instance, with conventional defaults.

use std::path::PathBuf;

use chrono::Duration;

// == Default Parameters ==
/// Conventional file name used by the default cache instance.
pub const DEFAULT_FILE_NAME: &str = "cache.db";

// == Cache Config ==
/// Construction parameters for a cache instance.
///
/// A cache is bound 1:1 to a backing file and applies a single validity
/// window uniformly to every collection it manages.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Path of the backing store file
    pub file_name: PathBuf,
    /// Validity window applied to every stored item
    pub validity: Duration,
}

impl Default for CacheConfig {
    /// Returns the conventional parameters: `cache.db` with a 1-day validity.
    fn default() -> Self {
        Self {
            file_name: PathBuf::from(DEFAULT_FILE_NAME),
            validity: Duration::days(1),
        }
    }
}
