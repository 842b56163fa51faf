//! Event store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// The expected version a writer passes when appending to a stream that
/// should not exist yet.
pub const NEW_STREAM_VERSION: i32 = -1;

/// Stored representation of a domain event, as persisted.
///
/// Rows are append-only: they are never updated or deleted. `(stream_id,
/// version)` is the primary key; `event_id` is unique across the whole
/// store.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    /// Stream (aggregate) this event belongs to.
    pub stream_id: Uuid,
    /// Position within the stream, contiguous from 0.
    pub version: i32,
    /// Type tag for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Serialized event metadata, `{}` when unused.
    pub metadata: serde_json::Value,
    /// Server-side timestamp assigned at append time.
    pub created_at: DateTime<Utc>,
    /// Globally unique event identifier (dedup guard).
    pub event_id: Uuid,
}

/// An event encoded for storage but not yet persisted: the codec's output,
/// awaiting the store-assigned version, id, and timestamp.
#[derive(Debug, Clone)]
pub struct EncodedEvent {
    /// Type tag for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Serialized event metadata.
    pub metadata: serde_json::Value,
}

impl EncodedEvent {
    /// Creates an encoded event with empty metadata.
    #[must_use]
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
            metadata: serde_json::json!({}),
        }
    }
}

/// Append-only, per-stream event log with optimistic concurrency.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Reads a stream in ascending version order, strictly after
    /// `from_exclusive_version`. Pass [`NEW_STREAM_VERSION`] to read from
    /// the beginning. A nonexistent stream yields an empty list, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the underlying storage
    /// fails.
    async fn read_stream(
        &self,
        stream_id: Uuid,
        from_exclusive_version: i32,
    ) -> Result<Vec<StoredEvent>, DomainError>;

    /// Appends a batch of events to a stream.
    ///
    /// The stream's current max version (or [`NEW_STREAM_VERSION`] when
    /// empty) must equal `expected_version`; otherwise nothing is written.
    /// Versions are assigned consecutively starting at
    /// `expected_version + 1`, each row is stamped with a server-side UTC
    /// timestamp and a fresh event id, and the whole batch is inserted
    /// atomically. The fully materialized rows are returned so callers can
    /// use them without re-reading. An empty batch is a no-op: no version
    /// check, no rows.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConcurrencyConflict` on an expected-version
    /// mismatch and `DomainError::Infrastructure` if the underlying storage
    /// fails.
    async fn append(
        &self,
        stream_id: Uuid,
        expected_version: i32,
        events: Vec<EncodedEvent>,
    ) -> Result<Vec<StoredEvent>, DomainError>;
}
