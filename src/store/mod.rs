//! Document Store Module
//!
//! Thin delegation layer over the embedded storage engine: named
//! collections of JSON documents with per-field secondary indexes.

mod collection;
mod document;
mod engine;

pub use collection::Collection;
pub use document::{Document, DocumentId};
pub use engine::Store;
