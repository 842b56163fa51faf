//! Event codec: the only place that understands the storage representation
//! of wallet events.
//!
//! Each domain event maps to a (type tag, JSON payload, JSON metadata)
//! triple and back. Payloads carry exactly the fields needed to
//! reconstruct the event; metadata is currently unused and stored as `{}`.

use chrono::{DateTime, Utc};
use ledger_core::error::DomainError;
use ledger_core::store::{EncodedEvent, StoredEvent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::events::{
    BALANCE_CHANGED_EVENT_TYPE, BalanceChanged, OperationKind, WALLET_CREATED_EVENT_TYPE,
    WalletCreated, WalletEvent,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletCreatedPayload {
    owner_id: Uuid,
    // Absent in legacy/partial rows; the row's own timestamp is the
    // fallback.
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceChangedPayload {
    amount: Decimal,
    operation: OperationKind,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Encodes a domain event into its storage triple.
#[must_use]
pub fn encode(event: &WalletEvent) -> EncodedEvent {
    let payload = match event {
        WalletEvent::Created(e) => serde_json::to_value(WalletCreatedPayload {
            owner_id: e.owner_id,
            created_at: Some(e.created_at),
        }),
        WalletEvent::BalanceChanged(e) => serde_json::to_value(BalanceChangedPayload {
            amount: e.amount,
            operation: e.operation,
            created_at: Some(e.created_at),
        }),
    }
    .expect("payload serialization is infallible");

    EncodedEvent::new(event.event_type(), payload)
}

/// Decodes a stored row back into its domain event.
///
/// # Errors
///
/// Returns `DomainError::UnknownEventType` for an unrecognized type tag
/// (data corruption or schema drift, not a business failure) and
/// `DomainError::InvalidPayload` when required fields are missing or
/// malformed.
pub fn decode(row: &StoredEvent) -> Result<WalletEvent, DomainError> {
    match row.event_type.as_str() {
        WALLET_CREATED_EVENT_TYPE => {
            let p: WalletCreatedPayload = parse_payload(row)?;
            Ok(WalletEvent::Created(WalletCreated {
                owner_id: p.owner_id,
                created_at: p.created_at.unwrap_or(row.created_at),
            }))
        }
        BALANCE_CHANGED_EVENT_TYPE => {
            let p: BalanceChangedPayload = parse_payload(row)?;
            Ok(WalletEvent::BalanceChanged(BalanceChanged {
                amount: p.amount,
                operation: p.operation,
                created_at: p.created_at.unwrap_or(row.created_at),
            }))
        }
        other => Err(DomainError::UnknownEventType(other.to_owned())),
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(row: &StoredEvent) -> Result<T, DomainError> {
    serde_json::from_value(row.payload.clone()).map_err(|e| DomainError::InvalidPayload {
        event_type: row.event_type.clone(),
        reason: e.to_string(),
    })
}
