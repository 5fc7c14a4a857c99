//! Store Engine Module
//!
//! Owns the connection to the backing file and hands out collection handles.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;
use crate::store::Collection;

// == Store ==
/// Handle to one backing store file.
///
/// Bound 1:1 to the file path supplied at open time. Dropping the store
/// flushes pending writes and releases the file lock. The handle is `Send`
/// but not `Sync`; callers that share a store across threads must wrap it
/// in their own lock, matching the engine's single-writer discipline.
#[derive(Debug)]
pub struct Store {
    /// Connection to the backing file
    conn: Connection,
    /// Path the store was opened with
    path: PathBuf,
}

impl Store {
    // == Open ==
    /// Opens (or creates) the backing file at `path`.
    ///
    /// Performs the once-per-lifetime maintenance pass: switches the file
    /// to write-ahead logging, flushes any pending log into the main file,
    /// then rebuilds the file to reclaim space from deleted documents.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;

        // These pragmas report their result as a row, so they cannot go
        // through execute()
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        conn.execute_batch("VACUUM")?;

        info!(path = %path.display(), "opened document store");

        Ok(Self { conn, path })
    }

    // == Collection ==
    /// Returns a typed handle to the named collection, creating it if missing.
    pub fn collection<'a, T>(&'a self, name: &str) -> Result<Collection<'a, T>> {
        Collection::create(&self.conn, name)
    }

    // == Path ==
    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Direct access to the underlying connection, for store-internal use.
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_backing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.db");

        let store = Store::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path);
    }

    #[test]
    fn test_open_is_repeatable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.db");

        // The maintenance pass must succeed on an already-populated file
        let first = Store::open(&path).unwrap();
        drop(first);
        let second = Store::open(&path);
        assert!(second.is_ok());
    }

    #[test]
    fn test_open_rejects_unusable_path() {
        let dir = TempDir::new().unwrap();
        // A directory is not a valid backing file
        let result = Store::open(dir.path());
        assert!(result.is_err());
    }
}
