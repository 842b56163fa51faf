//! Wallet Ledger — payment bounded context.
//!
//! An event-sourced wallet: one owner, one account. Balance changes are
//! recorded as immutable events and current state is derived by replay.
//! This crate holds the aggregate and its reducer, the event codec, the
//! command/query handlers, the integration-event contracts, and the
//! asynchronous read projection.

pub mod application;
pub mod codec;
pub mod contracts;
pub mod domain;
pub mod projection;
