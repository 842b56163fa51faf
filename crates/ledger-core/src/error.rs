//! Domain error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Variants fall into four groups with distinct recovery semantics:
/// validation (`InvalidArgument`, `InvalidAmount`), business rule
/// (`InsufficientFunds`, `NotInitialized`), concurrency
/// (`ConcurrencyConflict`), and data integrity (`UnknownEventType`,
/// `InvalidPayload`, `DocumentNotFound`). The first two groups are
/// recoverable by the caller; concurrency conflicts are recoverable by
/// re-reading the stream and retrying; data-integrity errors indicate
/// corruption or schema drift and abort the command.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A caller-supplied identifier or argument violates a precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A monetary amount was zero or negative.
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// A withdrawal would drive the balance negative.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The amount the caller tried to withdraw.
        requested: Decimal,
        /// The balance at the time of the attempt.
        available: Decimal,
    },

    /// A mutating operation was attempted before the aggregate had an
    /// identity (id + owner).
    #[error("wallet is not initialized")]
    NotInitialized,

    /// Optimistic concurrency conflict at append time. No partial write
    /// occurred; the caller owns the retry decision.
    #[error("concurrency conflict on stream {stream_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The stream that had the conflict.
        stream_id: Uuid,
        /// The version the writer expected.
        expected: i32,
        /// The version actually found.
        actual: i32,
    },

    /// A stored event carried a type tag no codec recognizes.
    #[error("unknown event type '{0}'")]
    UnknownEventType(String),

    /// A stored payload could not be decoded into its domain event.
    #[error("invalid payload for '{event_type}': {reason}")]
    InvalidPayload {
        /// The type tag of the offending row.
        event_type: String,
        /// Decoder diagnostic.
        reason: String,
    },

    /// The read-model document for a wallet is missing where it must exist
    /// (the creation event was lost or the projection ran out of order).
    #[error("read model document not found for wallet {0}")]
    DocumentNotFound(Uuid),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
