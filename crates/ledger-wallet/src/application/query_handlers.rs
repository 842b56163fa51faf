//! Query handlers for the wallet context.
//!
//! Two consistency levels: the strict query replays the full stream on
//! demand (always consistent, higher latency); the owner-scoped query reads
//! the asynchronous read-model document (lower latency, eventually
//! consistent). Callers choose deliberately.

use ledger_core::error::DomainError;
use ledger_core::store::EventStore;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::command_handlers::rehydrate;
use crate::projection::documents::WalletDocumentStore;

/// Strict balance query: replays the wallet's full event history.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` for nil ids and propagates
/// store/codec failures.
#[tracing::instrument(skip(store))]
pub async fn get_wallet_balance(
    wallet_id: Uuid,
    owner_id: Uuid,
    store: &dyn EventStore,
) -> Result<Decimal, DomainError> {
    let wallet = rehydrate(wallet_id, owner_id, store).await?;
    Ok(wallet.balance())
}

/// Owner-scoped balance query against the read model. Returns `None` until
/// the projection has caught up with the owner's latest wallet.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the document store fails.
#[tracing::instrument(skip(documents))]
pub async fn get_owner_balance(
    owner_id: Uuid,
    documents: &dyn WalletDocumentStore,
) -> Result<Option<Decimal>, DomainError> {
    let document = documents.latest_by_owner(owner_id).await?;
    Ok(document.and_then(|doc| doc.balance))
}
