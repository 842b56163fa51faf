//! Command handlers for the wallet context.
//!
//! Each handler orchestrates one write: load the stream, rehydrate a fresh
//! aggregate, apply the intent, encode and append the new events with an
//! expected-version check, advance the committed version, and publish an
//! integration event for the read projection.
//!
//! Concurrency conflicts propagate unchanged; the retry decision belongs to
//! the caller.

use ledger_core::clock::Clock;
use ledger_core::error::DomainError;
use ledger_core::store::{EventStore, NEW_STREAM_VERSION};
use uuid::Uuid;

use crate::codec;
use crate::contracts::{BalanceChangedEvent, IntegrationEventPublisher, WalletCreatedEvent};
use crate::domain::aggregates::Wallet;
use crate::domain::commands::{CreateWallet, Deposit, Withdraw};

/// Rehydrates a wallet from its stream: seed identity, decode history,
/// replay in order.
pub(crate) async fn rehydrate(
    wallet_id: Uuid,
    owner_id: Uuid,
    store: &dyn EventStore,
) -> Result<Wallet, DomainError> {
    let rows = store.read_stream(wallet_id, NEW_STREAM_VERSION).await?;
    let mut wallet = Wallet::new();
    wallet.init(wallet_id, owner_id)?;
    let history = rows
        .iter()
        .map(codec::decode)
        .collect::<Result<Vec<_>, _>>()?;
    wallet.replay(history, NEW_STREAM_VERSION);
    Ok(wallet)
}

/// Drains the aggregate's pending events, appends them with the current
/// expected version, and publishes the new balance. A drained batch of
/// zero events ends the command without touching the store or the broker.
async fn commit_and_publish(
    wallet: &mut Wallet,
    wallet_id: Uuid,
    store: &dyn EventStore,
    publisher: &dyn IntegrationEventPublisher,
) -> Result<(), DomainError> {
    let batch = wallet.dequeue_uncommitted();
    if batch.is_empty() {
        return Ok(());
    }

    let encoded = batch.iter().map(codec::encode).collect();
    store
        .append(wallet_id, wallet.expected_version(), encoded)
        .await?;
    wallet.mark_committed(batch.len());

    publisher
        .publish_balance_changed(&BalanceChangedEvent {
            wallet_id,
            balance: wallet.balance(),
        })
        .await
}

/// Handles [`CreateWallet`]: opens a new stream and announces the wallet.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` for a nil owner and propagates
/// store/publisher failures.
#[tracing::instrument(skip(clock, store, publisher))]
pub async fn handle_create_wallet(
    command: &CreateWallet,
    clock: &dyn Clock,
    store: &dyn EventStore,
    publisher: &dyn IntegrationEventPublisher,
) -> Result<Uuid, DomainError> {
    let now = clock.now();
    let mut wallet = Wallet::new();
    let wallet_id = wallet.create_new(command.owner_id, now)?;

    let batch = wallet.dequeue_uncommitted();
    let encoded = batch.iter().map(codec::encode).collect();
    store.append(wallet_id, NEW_STREAM_VERSION, encoded).await?;
    wallet.mark_committed(batch.len());

    publisher
        .publish_wallet_created(&WalletCreatedEvent {
            aggregate_id: wallet_id,
            owner_id: command.owner_id,
            created_at: now,
            balance: Some(wallet.balance()),
        })
        .await?;

    tracing::debug!(%wallet_id, "wallet created");
    Ok(wallet_id)
}

/// Handles [`Deposit`]: rehydrate, deposit, append, publish.
///
/// # Errors
///
/// Returns validation/business errors from the aggregate, and propagates
/// `DomainError::ConcurrencyConflict` and store/publisher failures.
#[tracing::instrument(skip(clock, store, publisher))]
pub async fn handle_deposit(
    command: &Deposit,
    clock: &dyn Clock,
    store: &dyn EventStore,
    publisher: &dyn IntegrationEventPublisher,
) -> Result<(), DomainError> {
    let mut wallet = rehydrate(command.wallet_id, command.owner_id, store).await?;
    wallet.deposit(command.amount, clock.now())?;
    commit_and_publish(&mut wallet, command.wallet_id, store, publisher).await
}

/// Handles [`Withdraw`]: rehydrate, withdraw, append, publish.
///
/// # Errors
///
/// Returns validation/business errors from the aggregate (including
/// `DomainError::InsufficientFunds`), and propagates
/// `DomainError::ConcurrencyConflict` and store/publisher failures.
#[tracing::instrument(skip(clock, store, publisher))]
pub async fn handle_withdraw(
    command: &Withdraw,
    clock: &dyn Clock,
    store: &dyn EventStore,
    publisher: &dyn IntegrationEventPublisher,
) -> Result<(), DomainError> {
    let mut wallet = rehydrate(command.wallet_id, command.owner_id, store).await?;
    wallet.withdraw(command.amount, clock.now())?;
    commit_and_publish(&mut wallet, command.wallet_id, store, publisher).await
}
