//! Cache Instance Module
//!
//! The public cache surface: typed get/insert operations over one backing
//! store, with lazy eviction applied on every read.

use std::path::Path;
use std::sync::Mutex;

use chrono::Duration;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::cache::eviction;
use crate::cache::resolver::{self, Cacheable};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::store::Store;

// == Cache ==
/// A persistent, time-expiring object cache.
///
/// Owns exactly one store handle, bound 1:1 to a backing file, and applies
/// a single validity window uniformly to every collection it manages.
/// All operations run inline on the calling thread and block until the
/// store completes its I/O; the cache adds no synchronization of its own.
///
/// The handle is released deterministically: explicitly via [`dispose`],
/// or when the instance is dropped.
///
/// [`dispose`]: Cache::dispose
#[derive(Debug)]
pub struct Cache {
    /// Store handle; `None` once disposed
    store: Option<Store>,
    /// Validity window applied to every stored item
    validity: Duration,
}

impl Cache {
    // == Open ==
    /// Opens (or creates) a cache backed by the file at `path`.
    ///
    /// Opening runs the store's one-time maintenance pass (checkpoint
    /// followed by rebuild). Fails if the backing file cannot be opened,
    /// is locked by another exclusive owner, or is corrupted.
    pub fn open(path: impl AsRef<Path>, validity: Duration) -> Result<Self> {
        Ok(Self {
            store: Some(Store::open(path)?),
            validity,
        })
    }

    // == With Config ==
    /// Opens a cache from configuration parameters.
    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        Self::open(&config.file_name, config.validity)
    }

    // == Default Instance ==
    /// Returns the process-wide default cache instance.
    ///
    /// Lazily constructed once with the conventional parameters
    /// (`cache.db`, 1-day validity) and alive for the process lifetime.
    /// Construction failure surfaces on every call until it succeeds.
    pub fn default_instance() -> Result<&'static Mutex<Cache>> {
        static DEFAULT: OnceCell<Mutex<Cache>> = OnceCell::new();
        DEFAULT.get_or_try_init(|| Cache::with_config(&CacheConfig::default()).map(Mutex::new))
    }

    // == Validity ==
    /// Returns the validity window of this instance.
    pub fn validity(&self) -> Duration {
        self.validity
    }

    fn store(&self) -> Result<&Store> {
        self.store.as_ref().ok_or(CacheError::Disposed)
    }

    // == Get One ==
    /// Returns the first live item matching the predicate, if any.
    ///
    /// Only the first matching document is examined: if it has expired it
    /// is deleted and the call yields nothing, even when a later match is
    /// still live. Absence and expiry are indistinguishable to the caller.
    pub fn get_one<T, P>(&self, predicate: P) -> Result<Option<T>>
    where
        T: Cacheable,
        P: Fn(&T) -> bool,
    {
        let collection = resolver::resolve::<T>(self.store()?)?;
        let first = collection.query(predicate)?.into_iter().next();
        eviction::ensure_validity(&collection, first, self.validity)
    }

    // == Get Many ==
    /// Returns all live items matching the predicate.
    ///
    /// The validity check runs independently on every matching document;
    /// expired ones are deleted as they are encountered. Survivors keep
    /// the store's native query order.
    pub fn get_many<T, P>(&self, predicate: P) -> Result<Vec<T>>
    where
        T: Cacheable,
        P: Fn(&T) -> bool,
    {
        let collection = resolver::resolve::<T>(self.store()?)?;
        let documents = collection.query(predicate)?;

        let mut items = Vec::new();
        for document in documents {
            if let Some(item) =
                eviction::ensure_validity(&collection, Some(document), self.validity)?
            {
                items.push(item);
            }
        }

        Ok(items)
    }

    // == Insert One ==
    /// Stores one item as a new document.
    ///
    /// The store assigns a fresh identifier carrying the current instant;
    /// the item's own fields play no part in expiry.
    pub fn insert_one<T: Cacheable>(&self, item: &T) -> Result<()> {
        let collection = resolver::resolve::<T>(self.store()?)?;
        collection.insert(item)?;
        Ok(())
    }

    // == Insert Many ==
    /// Stores a batch of items in one bulk operation.
    pub fn insert_many<T: Cacheable>(&self, items: &[T]) -> Result<()> {
        let collection = resolver::resolve::<T>(self.store()?)?;
        collection.insert_many(items)
    }

    // == Dispose ==
    /// Releases the store handle, flushing pending writes and the file lock.
    ///
    /// Idempotent: disposing twice, or disposing an instance whose handle
    /// is already gone, does nothing. Subsequent operations fail with
    /// [`CacheError::Disposed`].
    pub fn dispose(&mut self) {
        if self.store.take().is_some() {
            debug!("cache disposed, store handle released");
        }
    }
}
