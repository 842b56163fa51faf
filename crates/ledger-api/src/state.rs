//! Shared application state.

use std::sync::Arc;

use ledger_core::clock::Clock;
use ledger_core::store::EventStore;
use ledger_wallet::contracts::IntegrationEventPublisher;
use ledger_wallet::projection::WalletDocumentStore;

/// Application state shared across all request handlers. Collaborators are
/// passed explicitly; there is no process-wide container.
#[derive(Clone)]
pub struct AppState {
    /// Source of time for command handlers.
    pub clock: Arc<dyn Clock>,
    /// Append-only event log.
    pub event_store: Arc<dyn EventStore>,
    /// Seam to the message broker.
    pub publisher: Arc<dyn IntegrationEventPublisher>,
    /// Read-model document store.
    pub documents: Arc<dyn WalletDocumentStore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        event_store: Arc<dyn EventStore>,
        publisher: Arc<dyn IntegrationEventPublisher>,
        documents: Arc<dyn WalletDocumentStore>,
    ) -> Self {
        Self {
            clock,
            event_store,
            publisher,
            documents,
        }
    }
}
