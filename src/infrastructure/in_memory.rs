use crate::domain::account::{Account, AccountId};
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for ledger accounts.
///
/// Uses `Arc<RwLock<HashMap<AccountId, Arc<Account>>>>` to allow shared concurrent access.
/// The map lock only guards membership; balances live inside each `Account`, so
/// handing out an account never copies it.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<AccountId, Arc<Account>>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(&self, account: Account) -> Result<Arc<Account>> {
        let mut accounts = self.accounts.write().await;
        match accounts.entry(account.id().clone()) {
            Entry::Occupied(entry) => Err(LedgerError::DuplicateAccount(entry.key().clone())),
            Entry::Vacant(entry) => Ok(entry.insert(Arc::new(account)).clone()),
        }
    }

    async fn get(&self, account_id: &AccountId) -> Result<Option<Arc<Account>>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(account_id).cloned())
    }

    async fn all_accounts(&self) -> Result<Vec<Arc<Account>>> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<_> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(all)
    }
}
