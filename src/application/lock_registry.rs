use crate::domain::account::AccountId;
use crate::error::{LedgerError, Result};
use dashmap::DashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

static GLOBAL: LazyLock<Arc<LockRegistry>> = LazyLock::new(|| Arc::new(LockRegistry::new()));

/// Hands out one lock per account id, created lazily on first use.
///
/// The id -> lock map is a `DashMap`, so registering a lock only takes a shard
/// lock for the duration of the insert. Shard locks are never held while an
/// account lock is awaited, and lookups for unrelated accounts do not serialize
/// on a single map lock.
///
/// Entries are never evicted: the registry grows by one entry per distinct
/// account id it has ever seen.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry. It lives as long as the process and is what
    /// `TransferCoordinator::new` locks through.
    pub fn global() -> Arc<LockRegistry> {
        GLOBAL.clone()
    }

    /// Returns the lock for `account_id`, creating it if this is the first lookup.
    ///
    /// Concurrent first lookups of the same id all receive the same lock.
    pub fn acquire(&self, account_id: &AccountId) -> AccountLock {
        // The read guard must be gone before `entry` takes the shard's write lock.
        let existing = self.locks.get(account_id).map(|entry| entry.value().clone());
        let mutex = match existing {
            Some(mutex) => mutex,
            None => self
                .locks
                .entry(account_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value()
                .clone(),
        };
        AccountLock {
            account_id: account_id.clone(),
            mutex,
        }
    }

    /// Number of distinct accounts that have a registered lock.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Handle to the mutual-exclusion lock of a single account.
#[derive(Debug, Clone)]
pub struct AccountLock {
    account_id: AccountId,
    mutex: Arc<Mutex<()>>,
}

impl AccountLock {
    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// True if both handles refer to the same underlying lock.
    pub fn same_lock(&self, other: &AccountLock) -> bool {
        Arc::ptr_eq(&self.mutex, &other.mutex)
    }

    /// Waits until the lock is held. The lock is released when the guard drops.
    ///
    /// With a timeout, a wait that exceeds it fails with `LockTimeout`.
    pub async fn lock(&self, timeout: Option<Duration>) -> Result<AccountGuard> {
        let guard = match timeout {
            Some(limit) => tokio::time::timeout(limit, self.mutex.clone().lock_owned())
                .await
                .map_err(|_| LedgerError::LockTimeout {
                    account: self.account_id.clone(),
                    timeout: limit,
                })?,
            None => self.mutex.clone().lock_owned().await,
        };
        Ok(AccountGuard {
            account_id: self.account_id.clone(),
            _guard: guard,
        })
    }
}

/// Proof that the lock of `account_id` is held.
#[derive(Debug)]
pub struct AccountGuard {
    account_id: AccountId,
    _guard: OwnedMutexGuard<()>,
}

impl AccountGuard {
    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }
}
