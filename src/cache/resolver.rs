//! Collection Resolver Module
//!
//! Maps item types to ready-to-use, index-backed collections.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::store::{Collection, Store};

// == Index Spec ==
/// Declares a secondary index on one field of an item type.
#[derive(Debug, Clone, Copy)]
pub struct IndexSpec {
    /// Name of the indexed field
    pub field: &'static str,
    /// Whether the index enforces uniqueness
    pub unique: bool,
}

// == Cacheable ==
/// Item types that can be stored in the cache.
///
/// `TYPE_NAME` is the simple type name the collection name is derived
/// from; `indexes` lists the fields to keep secondary indexes on.
pub trait Cacheable: Serialize + DeserializeOwned {
    /// Simple name of the type, used to derive the collection name
    const TYPE_NAME: &'static str;

    /// Secondary indexes to maintain on the collection
    fn indexes() -> &'static [IndexSpec] {
        &[]
    }
}

// == Pluralize ==
/// Derives a collection name from a type name.
///
/// Fixed English heuristic: a trailing `y` becomes `ies`, anything else
/// gets an `s` appended. Irregular plurals are not handled, and two
/// distinctly-named types whose names pluralize to the same string will
/// silently share a collection.
pub(crate) fn pluralize(name: &str) -> String {
    match name.strip_suffix('y') {
        Some(stem) => format!("{stem}ies"),
        None => format!("{name}s"),
    }
}

// == Resolve ==
/// Resolves the collection for an item type.
///
/// Creates the collection if missing and ensures every declared index
/// exists, honoring its uniqueness flag. Resolution is type-level only
/// and safe to repeat on every operation.
pub(crate) fn resolve<T: Cacheable>(store: &Store) -> Result<Collection<'_, T>> {
    let collection = store.collection::<T>(&pluralize(T::TYPE_NAME))?;
    for index in T::indexes() {
        collection.ensure_index(index.field, index.unique)?;
    }
    Ok(collection)
}
