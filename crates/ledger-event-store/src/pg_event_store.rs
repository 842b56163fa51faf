//! `PostgreSQL` implementation of the `EventStore` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use ledger_core::error::DomainError;
use ledger_core::store::{EncodedEvent, EventStore, StoredEvent};

/// PostgreSQL-backed event store.
///
/// The expected-version check runs inside the same transaction as the
/// batch insert, and the `(stream_id, version)` primary key is the
/// authoritative conflict signal: a unique violation during insert means a
/// concurrent writer took the version slot and is reported as
/// [`DomainError::ConcurrencyConflict`], never as a generic database error.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct EventRow {
    stream_id: Uuid,
    version: i32,
    event_type: String,
    payload: serde_json::Value,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    event_id: Uuid,
}

impl From<EventRow> for StoredEvent {
    fn from(row: EventRow) -> Self {
        Self {
            stream_id: row.stream_id,
            version: row.version,
            event_type: row.event_type,
            payload: row.payload,
            metadata: row.metadata,
            created_at: row.created_at,
            event_id: row.event_id,
        }
    }
}

fn infra(error: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(error.to_string())
}

impl PgEventStore {
    /// Creates a new `PgEventStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_version(&self, stream_id: Uuid) -> Result<i32, DomainError> {
        let version: i32 =
            sqlx::query_scalar("SELECT COALESCE(MAX(version), -1) FROM wallet_events WHERE stream_id = $1")
                .bind(stream_id)
                .fetch_one(&self.pool)
                .await
                .map_err(infra)?;
        Ok(version)
    }

    /// Maps a failed insert to its domain meaning: a unique violation on
    /// the primary key is a lost race, anything else is infrastructure.
    async fn map_insert_error(
        &self,
        error: sqlx::Error,
        stream_id: Uuid,
        expected: i32,
    ) -> DomainError {
        let unique_violation = error
            .as_database_error()
            .is_some_and(|db| db.kind() == sqlx::error::ErrorKind::UniqueViolation);
        if !unique_violation {
            return infra(error);
        }
        match self.current_version(stream_id).await {
            Ok(actual) => DomainError::ConcurrencyConflict {
                stream_id,
                expected,
                actual,
            },
            Err(read_error) => read_error,
        }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    #[tracing::instrument(skip(self))]
    async fn read_stream(
        &self,
        stream_id: Uuid,
        from_exclusive_version: i32,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let rows: Vec<EventRow> = sqlx::query_as(
            "SELECT stream_id, version, event_type, payload, metadata, created_at, event_id
             FROM wallet_events
             WHERE stream_id = $1 AND version > $2
             ORDER BY version ASC",
        )
        .bind(stream_id)
        .bind(from_exclusive_version)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self, events), fields(event_count = events.len()))]
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

        let mut tx = self.pool.begin().await.map_err(infra)?;

        let actual: i32 =
            sqlx::query_scalar("SELECT COALESCE(MAX(version), -1) FROM wallet_events WHERE stream_id = $1")
                .bind(stream_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(infra)?;
        if actual != expected_version {
            tracing::debug!(expected_version, actual, "expected version mismatch");
            return Err(DomainError::ConcurrencyConflict {
                stream_id,
                expected: expected_version,
                actual,
            });
        }

        let now = Utc::now();
        let mut inserted = Vec::with_capacity(events.len());
        for (offset, event) in events.into_iter().enumerate() {
            let record = StoredEvent {
                stream_id,
                version: expected_version + 1 + offset as i32,
                event_type: event.event_type,
                payload: event.payload,
                metadata: event.metadata,
                created_at: now,
                event_id: Uuid::new_v4(),
            };

            let insert = sqlx::query(
                "INSERT INTO wallet_events
                     (stream_id, version, event_type, payload, metadata, created_at, event_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(record.stream_id)
            .bind(record.version)
            .bind(&record.event_type)
            .bind(&record.payload)
            .bind(&record.metadata)
            .bind(record.created_at)
            .bind(record.event_id)
            .execute(&mut *tx)
            .await;

            if let Err(error) = insert {
                // Dropping the transaction rolls the batch back; nothing
                // partial is ever observable.
                drop(tx);
                return Err(self
                    .map_insert_error(error, stream_id, expected_version)
                    .await);
            }
            inserted.push(record);
        }

        tx.commit().await.map_err(infra)?;
        tracing::debug!(events_appended = inserted.len(), "events committed to stream");
        Ok(inserted)
    }
}
