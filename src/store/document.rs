//! Document Module
//!
//! Raw stored documents and their timestamp-embedding identifiers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::{NoContext, Timestamp, Uuid};

use crate::error::{CacheError, Result};

// == Document Id ==
/// Identifier of a stored document.
///
/// Wraps a version-7 UUID, which embeds its own creation instant at
/// millisecond precision. The store assigns one per document at insert
/// time; identifiers are never reused. A document's age is always derived
/// from its identifier, never from application-supplied fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    // == Constructor ==
    /// Creates a fresh identifier stamped with the current instant.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    // == From Datetime ==
    /// Creates an identifier stamped with the given instant.
    ///
    /// The embedded instant is truncated to millisecond precision.
    /// Pre-epoch instants are clamped to the epoch.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        let seconds = datetime.timestamp().max(0) as u64;
        let nanos = datetime.timestamp_subsec_nanos();
        let timestamp = Timestamp::from_unix(NoContext, seconds, nanos);
        Self(Uuid::new_v7(timestamp))
    }

    // == Parse ==
    /// Decodes an identifier from its stored string form.
    pub fn parse(value: &str) -> Result<Self> {
        let uuid =
            Uuid::parse_str(value).map_err(|_| CacheError::MalformedId(value.to_string()))?;
        Ok(Self(uuid))
    }

    // == Created At ==
    /// Returns the creation instant embedded in the identifier.
    ///
    /// Fails with [`CacheError::MalformedId`] if the identifier carries no
    /// embedded timestamp (a non-v7 value read back from the store).
    pub fn created_at(&self) -> Result<DateTime<Utc>> {
        let timestamp = self
            .0
            .get_timestamp()
            .ok_or_else(|| CacheError::MalformedId(self.0.to_string()))?;
        let (seconds, nanos) = timestamp.to_unix();
        DateTime::from_timestamp(seconds as i64, nanos)
            .ok_or_else(|| CacheError::MalformedId(self.0.to_string()))
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// == Document ==
/// The raw stored form of one item: identifier plus serialized body.
///
/// Returned by collection queries before materialization so the validity
/// check can run against the identifier alone.
#[derive(Debug, Clone)]
pub struct Document {
    /// Store-assigned identifier
    pub id: DocumentId,
    /// Serialized item body
    pub body: Value,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_id_embeds_current_instant() {
        let before = Utc::now();
        let id = DocumentId::new();
        let after = Utc::now();

        let created = id.created_at().unwrap();
        // Identifier precision is one millisecond
        assert!(created >= before - chrono::Duration::milliseconds(1));
        assert!(created <= after + chrono::Duration::milliseconds(1));
    }

    #[test]
    fn test_from_datetime_roundtrip() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 45).unwrap()
            + chrono::Duration::milliseconds(250);

        let id = DocumentId::from_datetime(instant);
        assert_eq!(id.created_at().unwrap(), instant);
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = DocumentId::new();
        let parsed = DocumentId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let result = DocumentId::parse("not-a-uuid");
        assert!(matches!(result, Err(CacheError::MalformedId(_))));
    }

    #[test]
    fn test_created_at_rejects_id_without_timestamp() {
        // The nil UUID carries no embedded instant
        let id = DocumentId(Uuid::nil());
        assert!(matches!(id.created_at(), Err(CacheError::MalformedId(_))));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = DocumentId::new();
        let b = DocumentId::new();
        assert_ne!(a, b);
    }
}
