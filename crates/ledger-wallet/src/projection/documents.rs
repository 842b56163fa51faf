//! Read-model documents and the store seam they live behind.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledger_core::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Denormalized balance document, one per wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDocument {
    /// The wallet this document describes.
    pub wallet_id: Uuid,
    /// The wallet's owner.
    pub owner_id: Uuid,
    /// When the wallet was created.
    pub created_at: DateTime<Utc>,
    /// Last projected balance.
    pub balance: Option<Decimal>,
}

/// Seam to the document store backing the read model.
#[async_trait]
pub trait WalletDocumentStore: Send + Sync {
    /// Inserts or replaces the document for `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store fails.
    async fn upsert(&self, id: Uuid, document: WalletDocument) -> Result<(), DomainError>;

    /// Fetches the document for `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store fails.
    async fn get(&self, id: Uuid) -> Result<Option<WalletDocument>, DomainError>;

    /// Fetches the owner's most recently created wallet document, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store fails.
    async fn latest_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<WalletDocument>, DomainError>;
}

/// In-process document store: a mutex-guarded map keyed by wallet id.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<Uuid, WalletDocument>>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletDocumentStore for InMemoryDocumentStore {
    async fn upsert(&self, id: Uuid, document: WalletDocument) -> Result<(), DomainError> {
        self.documents
            .lock()
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?
            .insert(id, document);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<WalletDocument>, DomainError> {
        Ok(self
            .documents
            .lock()
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?
            .get(&id)
            .cloned())
    }

    async fn latest_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<WalletDocument>, DomainError> {
        Ok(self
            .documents
            .lock()
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?
            .values()
            .filter(|doc| doc.owner_id == owner_id)
            .max_by_key(|doc| doc.created_at)
            .cloned())
    }
}
