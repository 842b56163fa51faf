//! In-process integration-event dispatch.
//!
//! Stands in for the message broker: command handlers publish into an
//! unbounded channel and a background task drains it into the projection
//! consumers. Delivery happens after the write commits, with no ordering
//! guarantee relative to subsequent reads — the eventual-consistency gap is
//! inherent to the design, and callers needing strong consistency use the
//! strict query instead.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use ledger_core::error::DomainError;
use ledger_wallet::contracts::{
    BalanceChangedEvent, IntegrationEventPublisher, WalletCreatedEvent,
};
use ledger_wallet::projection::{
    WalletDocumentStore, project_balance_changed, project_wallet_created,
};

/// An integration event in flight between publisher and projection.
#[derive(Debug, Clone)]
pub enum IntegrationEvent {
    /// From the `wallet-created` topic.
    WalletCreated(WalletCreatedEvent),
    /// From the `balance-changed` topic.
    BalanceChanged(BalanceChangedEvent),
}

/// Publisher backed by a tokio mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: mpsc::UnboundedSender<IntegrationEvent>,
}

impl ChannelPublisher {
    /// Creates a publisher and the receiver end the projection drains.
    #[must_use]
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<IntegrationEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: IntegrationEvent) -> Result<(), DomainError> {
        self.sender
            .send(event)
            .map_err(|e| DomainError::Infrastructure(e.to_string()))
    }
}

#[async_trait]
impl IntegrationEventPublisher for ChannelPublisher {
    async fn publish_wallet_created(
        &self,
        event: &WalletCreatedEvent,
    ) -> Result<(), DomainError> {
        self.send(IntegrationEvent::WalletCreated(event.clone()))
    }

    async fn publish_balance_changed(
        &self,
        event: &BalanceChangedEvent,
    ) -> Result<(), DomainError> {
        self.send(IntegrationEvent::BalanceChanged(event.clone()))
    }
}

/// Routes one integration event to its projection consumer.
///
/// # Errors
///
/// Propagates the consumer's error, including the fatal
/// `DomainError::DocumentNotFound`.
pub async fn apply_integration_event(
    event: &IntegrationEvent,
    documents: &dyn WalletDocumentStore,
) -> Result<(), DomainError> {
    match event {
        IntegrationEvent::WalletCreated(e) => project_wallet_created(e, documents).await,
        IntegrationEvent::BalanceChanged(e) => project_balance_changed(e, documents).await,
    }
}

/// Drains the channel until every publisher is dropped, feeding each event
/// to the projection. Consumer failures are surfaced to operators via the
/// error log, not retried.
pub async fn run_projection(
    mut receiver: mpsc::UnboundedReceiver<IntegrationEvent>,
    documents: Arc<dyn WalletDocumentStore>,
) {
    while let Some(event) = receiver.recv().await {
        if let Err(error) = apply_integration_event(&event, documents.as_ref()).await {
            tracing::error!(%error, ?event, "projection failed to apply integration event");
        }
    }
}
