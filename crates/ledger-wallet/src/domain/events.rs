//! Domain events for the wallet stream.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type tag under which [`WalletCreated`] is stored.
pub const WALLET_CREATED_EVENT_TYPE: &str = "WalletCreated";

/// Type tag under which [`BalanceChanged`] is stored.
pub const BALANCE_CHANGED_EVENT_TYPE: &str = "BalanceChanged";

/// Direction of a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    /// Adds to the balance.
    Deposit,
    /// Subtracts from the balance.
    Withdraw,
}

/// Emitted once per wallet, when it is opened for an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletCreated {
    /// The owner the wallet belongs to. Fixed for the wallet's lifetime.
    pub owner_id: Uuid,
    /// Creation time, UTC.
    pub created_at: DateTime<Utc>,
}

/// Emitted for every deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChanged {
    /// The amount moved. Always positive; direction is in `operation`.
    pub amount: Decimal,
    /// Deposit or withdraw.
    pub operation: OperationKind,
    /// Time of the change, UTC.
    pub created_at: DateTime<Utc>,
}

/// The closed set of events a wallet stream can contain.
///
/// Adding a variant is a compile-time event for every reducer and codec
/// match; an unrecognized tag in storage is rejected by the codec before it
/// can reach a reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// A wallet was opened.
    Created(WalletCreated),
    /// The balance moved.
    BalanceChanged(BalanceChanged),
}

impl WalletEvent {
    /// Returns the storage type tag for this event.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Created(_) => WALLET_CREATED_EVENT_TYPE,
            Self::BalanceChanged(_) => BALANCE_CHANGED_EVENT_TYPE,
        }
    }

    /// Returns the event's own timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Created(e) => e.created_at,
            Self::BalanceChanged(e) => e.created_at,
        }
    }
}
