//! The wallet aggregate: a reducer over wallet events plus the uncommitted
//! buffer that marks the boundary of a pending transaction.

use chrono::{DateTime, Utc};
use ledger_core::error::DomainError;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::events::{BalanceChanged, OperationKind, WalletCreated, WalletEvent};

/// Event-sourced wallet: one owner, one account.
///
/// Instances are constructed fresh per command, rehydrated from the stream
/// (or created new), mutated in memory, and discarded when the command
/// completes. The committed version starts at −1 (empty stream) and only
/// advances through [`Wallet::replay`] and [`Wallet::mark_committed`].
#[derive(Debug)]
pub struct Wallet {
    id: Option<Uuid>,
    owner_id: Option<Uuid>,
    balance: Decimal,
    exists: bool,
    updated_at: Option<DateTime<Utc>>,
    version: i32,
    uncommitted: Vec<WalletEvent>,
}

impl Wallet {
    /// Creates an uninitialized wallet (no identity, version −1).
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: None,
            owner_id: None,
            balance: Decimal::ZERO,
            exists: false,
            updated_at: None,
            version: -1,
            uncommitted: Vec::new(),
        }
    }

    /// The wallet identifier, once assigned.
    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// The owner, fixed at creation.
    #[must_use]
    pub fn owner_id(&self) -> Option<Uuid> {
        self.owner_id
    }

    /// Current balance. Never negative.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Whether the wallet has an identity (created or initialized).
    #[must_use]
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Timestamp of the last applied event.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// The committed version: one less than the number of rows persisted
    /// for this stream.
    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }

    /// The version a writer should pass to the store's append: equal to the
    /// committed version until the pending events are confirmed.
    #[must_use]
    pub fn expected_version(&self) -> i32 {
        self.version
    }

    /// The version the stream will have once the pending events commit.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn pending_version(&self) -> i32 {
        self.version + self.uncommitted.len() as i32
    }

    /// Opens a new wallet for `owner_id`, assigning a fresh identifier and
    /// emitting [`WalletEvent::Created`]. A no-op returning the existing id
    /// if the wallet already exists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if `owner_id` is nil.
    pub fn create_new(
        &mut self,
        owner_id: Uuid,
        now_utc: DateTime<Utc>,
    ) -> Result<Uuid, DomainError> {
        if self.exists {
            return self.id.ok_or(DomainError::NotInitialized);
        }
        if owner_id.is_nil() {
            return Err(DomainError::InvalidArgument("owner id must not be nil"));
        }

        let id = Uuid::new_v4();
        self.id = Some(id);
        self.owner_id = Some(owner_id);
        self.exists = true;

        self.emit(WalletEvent::Created(WalletCreated {
            owner_id,
            created_at: now_utc,
        }));
        Ok(id)
    }

    /// Seeds identity (wallet id + owner) ahead of a replay. Idempotent;
    /// emits nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if either id is nil.
    pub fn init(&mut self, wallet_id: Uuid, owner_id: Uuid) -> Result<(), DomainError> {
        if self.exists {
            return Ok(());
        }
        if wallet_id.is_nil() {
            return Err(DomainError::InvalidArgument("wallet id must not be nil"));
        }
        if owner_id.is_nil() {
            return Err(DomainError::InvalidArgument("owner id must not be nil"));
        }

        self.id = Some(wallet_id);
        self.owner_id = Some(owner_id);
        self.exists = true;
        Ok(())
    }

    /// Adds `amount` to the balance, emitting a deposit event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotInitialized` if the wallet has no identity
    /// and `DomainError::InvalidAmount` if `amount` is not positive. No
    /// event is emitted on failure.
    pub fn deposit(&mut self, amount: Decimal, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_initialized()?;
        Self::ensure_positive(amount)?;

        self.emit(WalletEvent::BalanceChanged(BalanceChanged {
            amount,
            operation: OperationKind::Deposit,
            created_at: now,
        }));
        Ok(())
    }

    /// Subtracts `amount` from the balance, emitting a withdraw event. The
    /// balance must never go negative, so the check runs before the event
    /// is emitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotInitialized` if the wallet has no identity,
    /// `DomainError::InvalidAmount` if `amount` is not positive, and
    /// `DomainError::InsufficientFunds` if `amount` exceeds the balance.
    /// No event is emitted on failure.
    pub fn withdraw(&mut self, amount: Decimal, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_initialized()?;
        Self::ensure_positive(amount)?;
        if amount > self.balance {
            return Err(DomainError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        self.emit(WalletEvent::BalanceChanged(BalanceChanged {
            amount,
            operation: OperationKind::Withdraw,
            created_at: now,
        }));
        Ok(())
    }

    /// The reducer: applies one event to the in-memory state. Used both for
    /// live emission and for replay.
    pub fn apply(&mut self, event: &WalletEvent) {
        match event {
            WalletEvent::Created(e) => {
                // On replay the owner comes from the event itself.
                if self.owner_id.is_none() {
                    self.owner_id = Some(e.owner_id);
                }
                self.exists = true;
                self.updated_at = Some(e.created_at);
            }
            WalletEvent::BalanceChanged(e) => {
                self.balance = match e.operation {
                    OperationKind::Deposit => self.balance + e.amount,
                    OperationKind::Withdraw => self.balance - e.amount,
                };
                self.updated_at = Some(e.created_at);
            }
        }
    }

    /// Replays history in the order given, incrementing the version after
    /// each event, and resets the uncommitted buffer. Withdrawal invariants
    /// are not re-validated: history was validated at emission time.
    pub fn replay<I>(&mut self, history: I, starting_version: i32)
    where
        I: IntoIterator<Item = WalletEvent>,
    {
        self.version = starting_version;
        for event in history {
            self.apply(&event);
            self.version += 1;
        }
        self.uncommitted.clear();
    }

    /// Detaches and returns the buffer of newly emitted events for
    /// persistence, leaving it empty.
    #[must_use]
    pub fn dequeue_uncommitted(&mut self) -> Vec<WalletEvent> {
        std::mem::take(&mut self.uncommitted)
    }

    /// Newly emitted events pending persistence.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[WalletEvent] {
        &self.uncommitted
    }

    /// Advances the committed version by `committed_count` once the store
    /// confirms that many rows were durably appended.
    #[allow(clippy::cast_possible_wrap)]
    pub fn mark_committed(&mut self, committed_count: usize) {
        self.version += committed_count as i32;
    }

    fn emit(&mut self, event: WalletEvent) {
        self.apply(&event);
        self.uncommitted.push(event);
    }

    fn ensure_initialized(&self) -> Result<(), DomainError> {
        if self.exists && self.id.is_some() && self.owner_id.is_some() {
            Ok(())
        } else {
            Err(DomainError::NotInitialized)
        }
    }

    fn ensure_positive(amount: Decimal) -> Result<(), DomainError> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount(amount));
        }
        Ok(())
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_create_new_emits_wallet_created_and_sets_state() {
        // Arrange
        let owner_id = Uuid::new_v4();
        let mut wallet = Wallet::new();

        // Act
        let wallet_id = wallet.create_new(owner_id, fixed_now()).unwrap();

        // Assert
        assert!(wallet.exists());
        assert_eq!(wallet.id(), Some(wallet_id));
        assert_eq!(wallet.owner_id(), Some(owner_id));
        assert_eq!(wallet.balance(), Decimal::ZERO);
        assert_eq!(wallet.version(), -1);
        assert_eq!(wallet.pending_version(), 0);

        let events = wallet.uncommitted_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            WalletEvent::Created(e) => {
                assert_eq!(e.owner_id, owner_id);
                assert_eq!(e.created_at, fixed_now());
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[test]
    fn test_create_new_rejects_nil_owner() {
        let mut wallet = Wallet::new();

        let result = wallet.create_new(Uuid::nil(), fixed_now());

        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
        assert!(wallet.uncommitted_events().is_empty());
    }

    #[test]
    fn test_create_new_is_noop_when_wallet_exists() {
        let owner_id = Uuid::new_v4();
        let mut wallet = Wallet::new();
        let first_id = wallet.create_new(owner_id, fixed_now()).unwrap();

        let second_id = wallet.create_new(owner_id, fixed_now()).unwrap();

        assert_eq!(first_id, second_id);
        assert_eq!(wallet.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_init_rejects_nil_ids() {
        let mut wallet = Wallet::new();
        assert!(matches!(
            wallet.init(Uuid::nil(), Uuid::new_v4()),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            wallet.init(Uuid::new_v4(), Uuid::nil()),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_init_is_idempotent() {
        let wallet_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let mut wallet = Wallet::new();
        wallet.init(wallet_id, owner_id).unwrap();

        // A second init with different ids must not overwrite identity.
        wallet.init(Uuid::new_v4(), Uuid::new_v4()).unwrap();

        assert_eq!(wallet.id(), Some(wallet_id));
        assert_eq!(wallet.owner_id(), Some(owner_id));
        assert!(wallet.uncommitted_events().is_empty());
    }

    #[test]
    fn test_deposit_requires_initialization() {
        let mut wallet = Wallet::new();

        let result = wallet.deposit(Decimal::from(100), fixed_now());

        assert!(matches!(result, Err(DomainError::NotInitialized)));
        assert!(wallet.uncommitted_events().is_empty());
    }

    #[test]
    fn test_deposit_rejects_non_positive_amounts() {
        let mut wallet = Wallet::new();
        wallet.init(Uuid::new_v4(), Uuid::new_v4()).unwrap();

        for amount in [Decimal::ZERO, Decimal::from(-5)] {
            let result = wallet.deposit(amount, fixed_now());
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
        }
        assert!(wallet.uncommitted_events().is_empty());
        assert_eq!(wallet.balance(), Decimal::ZERO);
    }

    #[test]
    fn test_deposit_increases_balance_and_buffers_event() {
        let mut wallet = Wallet::new();
        wallet.init(Uuid::new_v4(), Uuid::new_v4()).unwrap();

        wallet.deposit(Decimal::from(100), fixed_now()).unwrap();

        assert_eq!(wallet.balance(), Decimal::from(100));
        let events = wallet.uncommitted_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            WalletEvent::BalanceChanged(e) => {
                assert_eq!(e.amount, Decimal::from(100));
                assert_eq!(e.operation, OperationKind::Deposit);
            }
            other => panic!("expected BalanceChanged, got {other:?}"),
        }
    }

    #[test]
    fn test_withdraw_rejects_amount_exceeding_balance() {
        let mut wallet = Wallet::new();
        wallet.init(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        wallet.deposit(Decimal::from(100), fixed_now()).unwrap();

        let result = wallet.withdraw(Decimal::from(150), fixed_now());

        match result.unwrap_err() {
            DomainError::InsufficientFunds {
                requested,
                available,
            } => {
                assert_eq!(requested, Decimal::from(150));
                assert_eq!(available, Decimal::from(100));
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }
        // Balance unchanged, no new event buffered beyond the deposit.
        assert_eq!(wallet.balance(), Decimal::from(100));
        assert_eq!(wallet.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_withdraw_decreases_balance() {
        let mut wallet = Wallet::new();
        wallet.init(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        wallet.deposit(Decimal::from(100), fixed_now()).unwrap();

        wallet.withdraw(Decimal::from(30), fixed_now()).unwrap();

        assert_eq!(wallet.balance(), Decimal::from(70));
        assert_eq!(wallet.uncommitted_events().len(), 2);
    }

    #[test]
    fn test_replay_reproduces_balance_and_version() {
        // Replaying created + deposit(100) + withdraw(30) yields balance 70
        // at version 2.
        let owner_id = Uuid::new_v4();
        let history = vec![
            WalletEvent::Created(WalletCreated {
                owner_id,
                created_at: fixed_now(),
            }),
            WalletEvent::BalanceChanged(BalanceChanged {
                amount: Decimal::from(100),
                operation: OperationKind::Deposit,
                created_at: fixed_now(),
            }),
            WalletEvent::BalanceChanged(BalanceChanged {
                amount: Decimal::from(30),
                operation: OperationKind::Withdraw,
                created_at: fixed_now(),
            }),
        ];
        let mut wallet = Wallet::new();
        wallet.init(Uuid::new_v4(), owner_id).unwrap();

        wallet.replay(history, -1);

        assert_eq!(wallet.balance(), Decimal::from(70));
        assert_eq!(wallet.version(), 2);
        assert!(wallet.uncommitted_events().is_empty());
    }

    #[test]
    fn test_replay_adopts_owner_from_history() {
        let owner_id = Uuid::new_v4();
        let mut wallet = Wallet::new();

        wallet.replay(
            vec![WalletEvent::Created(WalletCreated {
                owner_id,
                created_at: fixed_now(),
            })],
            -1,
        );

        assert_eq!(wallet.owner_id(), Some(owner_id));
        assert!(wallet.exists());
        assert_eq!(wallet.version(), 0);
    }

    #[test]
    fn test_replay_determinism_from_emitted_history() {
        // Whatever a live aggregate emits, a fresh aggregate replaying that
        // history lands on the same balance.
        let owner_id = Uuid::new_v4();
        let mut live = Wallet::new();
        let wallet_id = live.create_new(owner_id, fixed_now()).unwrap();
        live.deposit(Decimal::from(250), fixed_now()).unwrap();
        live.withdraw(Decimal::from(75), fixed_now()).unwrap();
        live.deposit(Decimal::new(1050, 2), fixed_now()).unwrap();
        let history = live.dequeue_uncommitted();

        let mut replayed = Wallet::new();
        replayed.init(wallet_id, owner_id).unwrap();
        replayed.replay(history, -1);

        assert_eq!(replayed.balance(), live.balance());
        assert_eq!(replayed.version(), 3);
    }

    #[test]
    fn test_dequeue_uncommitted_clears_buffer() {
        let mut wallet = Wallet::new();
        wallet.init(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        wallet.deposit(Decimal::from(10), fixed_now()).unwrap();

        let batch = wallet.dequeue_uncommitted();

        assert_eq!(batch.len(), 1);
        assert!(wallet.uncommitted_events().is_empty());
        assert!(wallet.dequeue_uncommitted().is_empty());
    }

    #[test]
    fn test_mark_committed_advances_expected_version() {
        let mut wallet = Wallet::new();
        wallet.create_new(Uuid::new_v4(), fixed_now()).unwrap();
        assert_eq!(wallet.expected_version(), -1);

        let batch = wallet.dequeue_uncommitted();
        wallet.mark_committed(batch.len());

        assert_eq!(wallet.expected_version(), 0);
        assert_eq!(wallet.pending_version(), 0);
    }
}
