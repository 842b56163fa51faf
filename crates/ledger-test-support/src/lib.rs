//! Shared test doubles for the wallet ledger.
//!
//! The in-memory event store is not a mock: it implements the full append
//! semantics (optimistic concurrency, atomic batches, unique event ids), so
//! handler and API tests exercise the same observable behavior the
//! PostgreSQL store provides.

mod clock;
mod store;

pub use clock::FixedClock;
pub use store::{FailingEventStore, InMemoryEventStore};
