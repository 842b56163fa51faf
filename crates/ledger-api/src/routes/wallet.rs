//! Routes for the wallet context.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledger_wallet::application::command_handlers::{
    handle_create_wallet, handle_deposit, handle_withdraw,
};
use ledger_wallet::application::query_handlers::{get_owner_balance, get_wallet_balance};
use ledger_wallet::domain::commands::{CreateWallet, Deposit, Withdraw};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWalletRequest {
    owner_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateWalletResponse {
    wallet_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveMoneyRequest {
    wallet_id: Uuid,
    owner_id: Uuid,
    amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerQuery {
    owner_id: Uuid,
}

/// POST /wallets
async fn create_wallet(
    State(state): State<AppState>,
    Json(request): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<CreateWalletResponse>), ApiError> {
    let wallet_id = handle_create_wallet(
        &CreateWallet {
            owner_id: request.owner_id,
        },
        state.clock.as_ref(),
        state.event_store.as_ref(),
        state.publisher.as_ref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CreateWalletResponse { wallet_id })))
}

/// POST /wallets/deposit
async fn deposit(
    State(state): State<AppState>,
    Json(request): Json<MoveMoneyRequest>,
) -> Result<StatusCode, ApiError> {
    handle_deposit(
        &Deposit {
            wallet_id: request.wallet_id,
            owner_id: request.owner_id,
            amount: request.amount,
        },
        state.clock.as_ref(),
        state.event_store.as_ref(),
        state.publisher.as_ref(),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /wallets/withdraw
async fn withdraw(
    State(state): State<AppState>,
    Json(request): Json<MoveMoneyRequest>,
) -> Result<StatusCode, ApiError> {
    handle_withdraw(
        &Withdraw {
            wallet_id: request.wallet_id,
            owner_id: request.owner_id,
            amount: request.amount,
        },
        state.clock.as_ref(),
        state.event_store.as_ref(),
        state.publisher.as_ref(),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /wallets/{wallet_id}/balance?ownerId=...
///
/// Strict: replays the full stream, always consistent with the ledger.
async fn wallet_balance(
    State(state): State<AppState>,
    Path(wallet_id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Decimal>, ApiError> {
    let balance =
        get_wallet_balance(wallet_id, query.owner_id, state.event_store.as_ref()).await?;
    Ok(Json(balance))
}

/// GET /wallets/owner/{owner_id}/balance
///
/// Read-model: lower latency, eventually consistent; null until the
/// projection has caught up.
async fn owner_balance(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
) -> Result<Json<Option<Decimal>>, ApiError> {
    let balance = get_owner_balance(owner_id, state.documents.as_ref()).await?;
    Ok(Json(balance))
}

/// Returns the router for the wallet context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_wallet))
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/{wallet_id}/balance", get(wallet_balance))
        .route("/owner/{owner_id}/balance", get(owner_balance))
}
