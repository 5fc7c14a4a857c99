//! Collection Module
//!
//! Typed handle to one named collection of documents.

use std::marker::PhantomData;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::store::{Document, DocumentId};

// == Collection ==
/// Handle to a named collection, parameterized by the item type it stores.
///
/// Documents live in one table per collection, keyed by their identifier,
/// with the serialized item as the body. Secondary indexes are maintained
/// on declared body fields.
pub struct Collection<'a, T> {
    /// Connection of the owning store
    conn: &'a Connection,
    /// Collection (table) name
    name: String,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T> Collection<'a, T> {
    // == Create ==
    /// Opens the named collection, creating its table if missing.
    pub(crate) fn create(conn: &'a Connection, name: &str) -> Result<Self> {
        conn.execute(
            &format!(
                r#"CREATE TABLE IF NOT EXISTS "{name}" (id TEXT PRIMARY KEY, body TEXT NOT NULL)"#
            ),
            [],
        )?;

        Ok(Self {
            conn,
            name: name.to_string(),
            _item: PhantomData,
        })
    }

    // == Name ==
    /// Returns the collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Ensure Index ==
    /// Ensures a secondary index exists on the given body field.
    ///
    /// Safe to call on every resolution: an already-present index is left
    /// untouched and repeated calls neither error nor duplicate work.
    pub fn ensure_index(&self, field: &str, unique: bool) -> Result<()> {
        let index_name = format!("idx_{}_{}", self.name, field);
        let uniqueness = if unique { "UNIQUE " } else { "" };
        self.conn.execute(
            &format!(
                r#"CREATE {uniqueness}INDEX IF NOT EXISTS "{index_name}"
                   ON "{name}" (json_extract(body, '$.{field}'))"#,
                name = self.name,
            ),
            [],
        )?;
        Ok(())
    }
}

impl<T> Collection<'_, T>
where
    T: Serialize + DeserializeOwned,
{
    // == Query ==
    /// Returns the raw documents whose items satisfy the predicate.
    ///
    /// Each candidate is deserialized transiently to evaluate the
    /// predicate; the raw form is what gets returned, in the store's
    /// native scan order. A row that cannot be deserialized into the item
    /// type fails the whole query.
    pub fn query<P>(&self, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(&T) -> bool,
    {
        let mut stmt = self
            .conn
            .prepare(&format!(r#"SELECT id, body FROM "{}""#, self.name))?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, body) = row?;
            let id = DocumentId::parse(&id)?;
            let body: Value = serde_json::from_str(&body)?;
            let item: T = serde_json::from_value(body.clone())?;
            if predicate(&item) {
                documents.push(Document { id, body });
            }
        }

        Ok(documents)
    }

    // == Insert ==
    /// Inserts one item as a new document with a fresh identifier.
    pub fn insert(&self, item: &T) -> Result<DocumentId> {
        let id = DocumentId::new();
        let body = serde_json::to_string(item)?;
        self.conn.execute(
            &format!(r#"INSERT INTO "{}" (id, body) VALUES (?1, ?2)"#, self.name),
            params![id.to_string(), body],
        )?;
        Ok(id)
    }

    // == Insert Many ==
    /// Inserts a batch of items in one store transaction.
    ///
    /// A mid-batch failure rolls the transaction back at the engine level;
    /// the error propagates unchanged.
    pub fn insert_many(&self, items: &[T]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                r#"INSERT INTO "{}" (id, body) VALUES (?1, ?2)"#,
                self.name
            ))?;
            for item in items {
                let id = DocumentId::new();
                let body = serde_json::to_string(item)?;
                stmt.execute(params![id.to_string(), body])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // == Delete ==
    /// Deletes the document with the given identifier.
    ///
    /// Deleting an identifier that is no longer present is a no-op.
    pub fn delete(&self, id: &DocumentId) -> Result<()> {
        self.conn.execute(
            &format!(r#"DELETE FROM "{}" WHERE id = ?1"#, self.name),
            params![id.to_string()],
        )?;
        Ok(())
    }
}
