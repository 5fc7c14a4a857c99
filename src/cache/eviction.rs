//! Eviction Policy Module
//!
//! Lazy expiry: validity is checked at read time, and expired documents
//! are deleted by the read that finds them. There is no background sweep,
//! so an expired document that is never queried again stays on disk.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::store::{Collection, Document};

// == Is Expired ==
/// Decides whether a document created at `created_at` has outlived the
/// validity window at instant `now`.
///
/// Boundary condition: a document whose age equals the validity window
/// exactly is still live; only a strictly greater age expires it. A
/// creation instant in the future (negative age) never expires.
pub(crate) fn is_expired(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    validity: Duration,
) -> bool {
    now.signed_duration_since(created_at) > validity
}

// == Ensure Validity ==
/// Applies the validity check to one raw document.
///
/// Absent input yields absence. An expired document is deleted from its
/// origin collection and yields absence; the delete is unconditional and
/// synchronous with the read. A live document is materialized into the
/// item type.
pub(crate) fn ensure_validity<T>(
    collection: &Collection<'_, T>,
    document: Option<Document>,
    validity: Duration,
) -> Result<Option<T>>
where
    T: Serialize + DeserializeOwned,
{
    let Some(document) = document else {
        return Ok(None);
    };

    let created_at = document.id.created_at()?;
    if is_expired(created_at, Utc::now(), validity) {
        collection.delete(&document.id)?;
        debug!(
            collection = collection.name(),
            id = %document.id,
            "evicted expired document"
        );
        return Ok(None);
    }

    let item = serde_json::from_value(document.body)?;
    Ok(Some(item))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentId, Store};
    use rusqlite::params;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    fn open_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    /// Inserts a document whose identifier is stamped with `created_at`.
    fn insert_backdated(store: &Store, created_at: DateTime<Utc>, text: &str) -> DocumentId {
        let id = DocumentId::from_datetime(created_at);
        let body = serde_json::to_string(&Note {
            text: text.to_string(),
        })
        .unwrap();
        store
            .connection()
            .execute(
                r#"INSERT INTO "Notes" (id, body) VALUES (?1, ?2)"#,
                params![id.to_string(), body],
            )
            .unwrap();
        id
    }

    #[test]
    fn test_is_expired_strictly_greater() {
        let created = Utc::now();
        let validity = Duration::hours(24);

        // Age exactly equal to the validity window is still live
        assert!(!is_expired(created, created + validity, validity));
        // One unit past the window is expired
        assert!(is_expired(
            created,
            created + validity + Duration::milliseconds(1),
            validity
        ));
    }

    #[test]
    fn test_is_expired_future_creation() {
        let now = Utc::now();
        let validity = Duration::hours(1);

        // Clock skew: a creation instant in the future never expires
        assert!(!is_expired(now + Duration::minutes(10), now, validity));
    }

    #[test]
    fn test_is_expired_zero_validity() {
        let created = Utc::now();
        let validity = Duration::zero();

        assert!(!is_expired(created, created, validity));
        assert!(is_expired(created, created + Duration::milliseconds(1), validity));
    }

    #[test]
    fn test_absent_document_yields_absence() {
        let (_dir, store) = open_store();
        let notes = store.collection::<Note>("Notes").unwrap();

        let result = ensure_validity(&notes, None, Duration::hours(1)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_live_document_is_materialized() {
        let (_dir, store) = open_store();
        let notes = store.collection::<Note>("Notes").unwrap();

        notes
            .insert(&Note {
                text: "still fresh".to_string(),
            })
            .unwrap();

        let document = notes.query(|_: &Note| true).unwrap().into_iter().next();
        let item = ensure_validity(&notes, document, Duration::hours(1)).unwrap();
        assert_eq!(item.unwrap().text, "still fresh");
    }

    #[test]
    fn test_expired_document_is_deleted_on_read() {
        let (_dir, store) = open_store();
        let notes = store.collection::<Note>("Notes").unwrap();

        insert_backdated(&store, Utc::now() - Duration::hours(2), "stale");

        let document = notes.query(|_: &Note| true).unwrap().into_iter().next();
        assert!(document.is_some());

        let result = ensure_validity(&notes, document, Duration::hours(1)).unwrap();
        assert!(result.is_none());

        // The delete happened synchronously with the read
        assert!(notes.query(|_: &Note| true).unwrap().is_empty());
    }

    #[test]
    fn test_backdated_document_inside_window_survives() {
        let (_dir, store) = open_store();
        let notes = store.collection::<Note>("Notes").unwrap();

        // Comfortably inside the window; the boundary itself is covered by
        // the pure is_expired tests above
        insert_backdated(&store, Utc::now() - Duration::minutes(30), "fresh");

        let document = notes.query(|_: &Note| true).unwrap().into_iter().next();
        let result = ensure_validity(&notes, document, Duration::hours(1)).unwrap();
        assert!(result.is_some());
        assert_eq!(notes.query(|_: &Note| true).unwrap().len(), 1);
    }
}
