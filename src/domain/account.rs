use crate::error::{LedgerError, Result};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque account identifier.
///
/// Ordering is lexicographic over the underlying string, which gives the
/// direction-independent total order used to sequence lock acquisition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Represents a monetary value held by an account.
///
/// This is a wrapper around `rust_decimal::Decimal` to keep ledger arithmetic
/// exact and to give balances their own type distinct from transfer amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Subtracts `amount`, returning `None` on overflow or if the result would be negative.
    pub fn checked_debit(self, amount: Amount) -> Option<Self> {
        let next = self.0.checked_sub(amount.value())?;
        (next >= Decimal::ZERO).then_some(Self(next))
    }

    /// Adds `amount`, returning `None` on overflow.
    pub fn checked_credit(self, amount: Amount) -> Option<Self> {
        self.0.checked_add(amount.value()).map(Self)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}

/// Represents a positive monetary amount for transfers.
///
/// Ensures that transfer amounts are always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidAmount(format!(
                "{value} is not a positive value"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}

/// A ledger account.
///
/// Accounts are shared between callers behind an `Arc`, so the balance lives in
/// an interior cell. Writes go through the transfer coordinator, which only
/// performs them while it holds the account's lock from the lock registry.
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    balance: RwLock<Balance>,
}

impl Account {
    /// Creates an account with an opening balance, which must not be negative.
    pub fn new(id: impl Into<AccountId>, balance: Balance) -> Result<Self> {
        let id = id.into();
        if balance.is_negative() {
            return Err(LedgerError::InvalidAmount(format!(
                "opening balance {balance} of account {id} is negative"
            )));
        }
        Ok(Self {
            id,
            balance: RwLock::new(balance),
        })
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Current balance of this account alone.
    ///
    /// This does not take the account's transfer lock: reading two accounts one
    /// after the other can land between a debit and its credit. Use
    /// `TransferCoordinator::snapshot` for a consistent view across accounts.
    pub fn balance(&self) -> Balance {
        *self.balance.read()
    }

    pub(crate) fn set_balance(&self, balance: Balance) {
        *self.balance.write() = balance;
    }
}
