//! Commands for the wallet context.

use rust_decimal::Decimal;
use uuid::Uuid;

/// Command to open a wallet for an owner.
#[derive(Debug, Clone)]
pub struct CreateWallet {
    /// The owner the wallet belongs to.
    pub owner_id: Uuid,
}

/// Command to deposit into a wallet.
#[derive(Debug, Clone)]
pub struct Deposit {
    /// The wallet identifier.
    pub wallet_id: Uuid,
    /// The wallet's owner.
    pub owner_id: Uuid,
    /// The amount to deposit. Must be positive.
    pub amount: Decimal,
}

/// Command to withdraw from a wallet.
#[derive(Debug, Clone)]
pub struct Withdraw {
    /// The wallet identifier.
    pub wallet_id: Uuid,
    /// The wallet's owner.
    pub owner_id: Uuid,
    /// The amount to withdraw. Must be positive and covered by the balance.
    pub amount: Decimal,
}
