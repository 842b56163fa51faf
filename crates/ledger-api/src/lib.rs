//! Axum HTTP surface for the wallet ledger.
//!
//! Thin adapters over the command and query handlers in `ledger-wallet`:
//! request parsing, status-code mapping, and the in-process dispatch of
//! integration events to the read projection.

use axum::Router;

pub mod dispatch;
pub mod error;
pub mod routes;
pub mod state;

/// Builds the application router. Middleware layers (trace, CORS) are added
/// by the binary.
pub fn app(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/wallets", routes::wallet::router())
        .with_state(state)
}
