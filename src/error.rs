use crate::domain::account::AccountId;
use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
    #[error("Account already exists: {0}")]
    DuplicateAccount(AccountId),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: AccountId,
        balance: Decimal,
        requested: Decimal,
    },
    #[error("Timed out after {timeout:?} waiting for the lock on account {account}")]
    LockTimeout {
        account: AccountId,
        timeout: Duration,
    },
    #[error("Balance overflow on account {0}")]
    BalanceOverflow(AccountId),
    #[error("Notification failed: {0}")]
    NotificationFailed(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl LedgerError {
    /// Returns true for failures caused by the request itself rather than the engine.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::AccountNotFound(_)
                | LedgerError::InvalidAmount(_)
                | LedgerError::InsufficientFunds { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
