//! In-memory `EventStore` implementations for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use ledger_core::clock::{Clock, SystemClock};
use ledger_core::error::DomainError;
use ledger_core::store::{EncodedEvent, EventStore, NEW_STREAM_VERSION, StoredEvent};

/// Thread-safe in-memory event store with the full append contract:
/// expected-version check, consecutive version assignment, server-side
/// timestamps, fresh unique event ids, and all-or-nothing batches (one lock
/// guards the whole append).
pub struct InMemoryEventStore {
    streams: Mutex<HashMap<Uuid, Vec<StoredEvent>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryEventStore {
    /// Creates an empty store stamping rows with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store stamping rows with the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            streams: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn read_stream(
        &self,
        stream_id: Uuid,
        from_exclusive_version: i32,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self
            .streams
            .lock()
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;
        Ok(streams
            .get(&stream_id)
            .map(|stream| {
                stream
                    .iter()
                    .filter(|row| row.version > from_exclusive_version)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    async fn append(
        &self,
        stream_id: Uuid,
        expected_version: i32,
        events: Vec<EncodedEvent>,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let mut streams = self
            .streams
            .lock()
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;
        let stream = streams.entry(stream_id).or_default();

        let actual = stream
            .last()
            .map_or(NEW_STREAM_VERSION, |row| row.version);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                stream_id,
                expected: expected_version,
                actual,
            });
        }

        let now = self.clock.now();
        let inserted: Vec<StoredEvent> = events
            .into_iter()
            .enumerate()
            .map(|(offset, event)| StoredEvent {
                stream_id,
                version: expected_version + 1 + offset as i32,
                event_type: event.event_type,
                payload: event.payload,
                metadata: event.metadata,
                created_at: now,
                event_id: Uuid::new_v4(),
            })
            .collect();

        stream.extend(inserted.iter().cloned());
        Ok(inserted)
    }
}

/// An event store that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventStore;

#[async_trait]
impl EventStore for FailingEventStore {
    async fn read_stream(
        &self,
        _stream_id: Uuid,
        _from_exclusive_version: i32,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn append(
        &self,
        _stream_id: Uuid,
        _expected_version: i32,
        _events: Vec<EncodedEvent>,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
