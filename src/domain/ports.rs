use super::account::{Account, AccountId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Holds the ledger's accounts.
///
/// `get` hands out shared references: every holder observes the same balance cell,
/// so a transfer applied through one reference is visible through all others.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, account: Account) -> Result<Arc<Account>>;
    async fn get(&self, account_id: &AccountId) -> Result<Option<Arc<Account>>>;
    async fn all_accounts(&self) -> Result<Vec<Arc<Account>>>;
}

/// Informs an account holder about activity on their account.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, account: &Account, message: &str) -> Result<()>;
}

pub type AccountStoreRef = Arc<dyn AccountStore>;
pub type NotifierRef = Arc<dyn Notifier>;
