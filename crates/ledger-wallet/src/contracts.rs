//! Integration events published after successful writes and consumed by the
//! read projection, plus the publisher seam the command handlers use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledger_core::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Logical topic names.
pub mod topics {
    /// Topic carrying [`WalletCreatedEvent`](super::WalletCreatedEvent).
    pub const WALLET_CREATED: &str = "wallet-created";
    /// Topic carrying [`BalanceChangedEvent`](super::BalanceChangedEvent).
    pub const BALANCE_CHANGED: &str = "balance-changed";
}

/// Published once per wallet, after the creation event commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCreatedEvent {
    /// The new wallet's identifier.
    pub aggregate_id: Uuid,
    /// The wallet's owner.
    pub owner_id: Uuid,
    /// Creation time, UTC.
    pub created_at: DateTime<Utc>,
    /// Starting balance.
    pub balance: Option<Decimal>,
}

/// Published after every committed deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChangedEvent {
    /// The wallet whose balance moved.
    pub wallet_id: Uuid,
    /// The balance after the change.
    pub balance: Decimal,
}

/// Seam to the message broker. Implementations deliver at least once; the
/// projection consumers are idempotent to match.
#[async_trait]
pub trait IntegrationEventPublisher: Send + Sync {
    /// Publishes to the `wallet-created` topic.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if delivery to the broker
    /// fails.
    async fn publish_wallet_created(
        &self,
        event: &WalletCreatedEvent,
    ) -> Result<(), DomainError>;

    /// Publishes to the `balance-changed` topic.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if delivery to the broker
    /// fails.
    async fn publish_balance_changed(
        &self,
        event: &BalanceChangedEvent,
    ) -> Result<(), DomainError>;
}
