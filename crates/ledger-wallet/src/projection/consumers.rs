//! Projection consumers, one per integration-event topic.
//!
//! Both are idempotent with respect to at-least-once delivery: replaying
//! the same event lands the document in the same state.

use ledger_core::error::DomainError;

use crate::contracts::{BalanceChangedEvent, WalletCreatedEvent};

use super::documents::{WalletDocument, WalletDocumentStore};

/// Upserts the read-model document for a newly created wallet.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the document store fails.
#[tracing::instrument(skip(documents))]
pub async fn project_wallet_created(
    event: &WalletCreatedEvent,
    documents: &dyn WalletDocumentStore,
) -> Result<(), DomainError> {
    let document = WalletDocument {
        wallet_id: event.aggregate_id,
        owner_id: event.owner_id,
        created_at: event.created_at,
        balance: event.balance,
    };
    documents.upsert(event.aggregate_id, document).await
}

/// Overwrites the projected balance for a wallet.
///
/// # Errors
///
/// Returns `DomainError::DocumentNotFound` if no document exists for the
/// wallet — the creation event was lost or the projection ran out of
/// order, which is fatal rather than a business failure — and
/// `DomainError::Infrastructure` if the document store fails.
#[tracing::instrument(skip(documents))]
pub async fn project_balance_changed(
    event: &BalanceChangedEvent,
    documents: &dyn WalletDocumentStore,
) -> Result<(), DomainError> {
    let mut document = documents
        .get(event.wallet_id)
        .await?
        .ok_or(DomainError::DocumentNotFound(event.wallet_id))?;

    document.balance = Some(event.balance);
    documents.upsert(event.wallet_id, document).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::documents::InMemoryDocumentStore;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn created_event(wallet_id: Uuid, owner_id: Uuid) -> WalletCreatedEvent {
        WalletCreatedEvent {
            aggregate_id: wallet_id,
            owner_id,
            created_at: Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap(),
            balance: Some(Decimal::ZERO),
        }
    }

    #[tokio::test]
    async fn test_wallet_created_upserts_document() {
        let wallet_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let documents = InMemoryDocumentStore::new();

        project_wallet_created(&created_event(wallet_id, owner_id), &documents)
            .await
            .unwrap();

        let doc = documents.get(wallet_id).await.unwrap().unwrap();
        assert_eq!(doc.wallet_id, wallet_id);
        assert_eq!(doc.owner_id, owner_id);
        assert_eq!(doc.balance, Some(Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_wallet_created_is_idempotent() {
        let wallet_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let documents = InMemoryDocumentStore::new();
        let event = created_event(wallet_id, owner_id);

        project_wallet_created(&event, &documents).await.unwrap();
        let first = documents.get(wallet_id).await.unwrap();
        project_wallet_created(&event, &documents).await.unwrap();
        let second = documents.get(wallet_id).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_balance_changed_overwrites_balance() {
        let wallet_id = Uuid::new_v4();
        let documents = InMemoryDocumentStore::new();
        project_wallet_created(&created_event(wallet_id, Uuid::new_v4()), &documents)
            .await
            .unwrap();

        let event = BalanceChangedEvent {
            wallet_id,
            balance: Decimal::from(125),
        };
        project_balance_changed(&event, &documents).await.unwrap();
        // Redelivery lands in the same state.
        project_balance_changed(&event, &documents).await.unwrap();

        let doc = documents.get(wallet_id).await.unwrap().unwrap();
        assert_eq!(doc.balance, Some(Decimal::from(125)));
    }

    #[tokio::test]
    async fn test_balance_changed_without_document_is_fatal() {
        let wallet_id = Uuid::new_v4();
        let documents = InMemoryDocumentStore::new();

        let result = project_balance_changed(
            &BalanceChangedEvent {
                wallet_id,
                balance: Decimal::from(10),
            },
            &documents,
        )
        .await;

        match result.unwrap_err() {
            DomainError::DocumentNotFound(id) => assert_eq!(id, wallet_id),
            other => panic!("expected DocumentNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_latest_by_owner_prefers_newest_wallet() {
        let owner_id = Uuid::new_v4();
        let older = Uuid::new_v4();
        let newer = Uuid::new_v4();
        let documents = InMemoryDocumentStore::new();

        let mut first = created_event(older, owner_id);
        first.created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut second = created_event(newer, owner_id);
        second.created_at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        second.balance = Some(Decimal::from(42));

        project_wallet_created(&first, &documents).await.unwrap();
        project_wallet_created(&second, &documents).await.unwrap();

        let doc = documents.latest_by_owner(owner_id).await.unwrap().unwrap();
        assert_eq!(doc.wallet_id, newer);
        assert_eq!(doc.balance, Some(Decimal::from(42)));
    }
}
