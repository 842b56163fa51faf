//! Asynchronous read projection: a denormalized balance document per
//! wallet, maintained by consuming integration events.
//!
//! The projection is eventually consistent with the ledger. Callers that
//! need strong consistency must use the strict (full-replay) query in
//! [`crate::application::query_handlers`] instead.

pub mod consumers;
pub mod documents;

pub use consumers::{project_balance_changed, project_wallet_created};
pub use documents::{InMemoryDocumentStore, WalletDocument, WalletDocumentStore};
