use super::lock_registry::{AccountGuard, LockRegistry};
use crate::domain::account::{Account, AccountId, Amount, Balance};
use crate::domain::ports::{AccountStoreRef, NotifierRef};
use crate::domain::transfer::{PrecisionPolicy, TransferRequest, TransferResult};
use crate::error::{LedgerError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Tunables for the transfer coordinator.
#[derive(Debug, Clone, Default)]
pub struct TransferConfig {
    /// Which amounts are accepted.
    pub precision: PrecisionPolicy,
    /// Upper bound on each lock wait. `None` waits indefinitely.
    pub lock_timeout: Option<Duration>,
}

/// Moves funds between accounts of the ledger.
///
/// `TransferCoordinator` is safe to share between tasks (wrap it in an `Arc`).
/// Every transfer locks the accounts it touches through a [`LockRegistry`],
/// always in ascending `AccountId` order, so transfers racing in opposite
/// directions over the same pair can never wait on each other in a cycle.
///
/// Coordinators built with [`TransferCoordinator::new`] all lock through the
/// process-wide [`LockRegistry::global`], so any number of them can work on the
/// same store.
pub struct TransferCoordinator {
    accounts: AccountStoreRef,
    notifier: NotifierRef,
    locks: Arc<LockRegistry>,
    config: TransferConfig,
}

/// The account locks held for one transfer.
enum HeldLocks {
    Single(AccountGuard),
    Pair(AccountGuard, AccountGuard),
}

impl HeldLocks {
    fn covers(&self, account_id: &AccountId) -> bool {
        match self {
            HeldLocks::Single(guard) => guard.account_id() == account_id,
            HeldLocks::Pair(first, second) => {
                first.account_id() == account_id || second.account_id() == account_id
            }
        }
    }
}

/// Balances written by a committed transfer.
struct Committed {
    from_balance: Balance,
    to_balance: Balance,
}

impl TransferCoordinator {
    /// Creates a coordinator that locks through the process-wide registry.
    pub fn new(accounts: AccountStoreRef, notifier: NotifierRef, config: TransferConfig) -> Self {
        Self::with_lock_registry(accounts, notifier, LockRegistry::global(), config)
    }

    /// Creates a coordinator that locks through `locks` instead of the
    /// process-wide registry. Only coordinators sharing `locks` exclude each other.
    pub fn with_lock_registry(
        accounts: AccountStoreRef,
        notifier: NotifierRef,
        locks: Arc<LockRegistry>,
        config: TransferConfig,
    ) -> Self {
        Self {
            accounts,
            notifier,
            locks,
            config,
        }
    }

    pub fn lock_registry(&self) -> &Arc<LockRegistry> {
        &self.locks
    }

    /// Transfers `request.amount` from the source to the target account.
    ///
    /// Fails without touching any balance when an account is unknown, the amount
    /// is rejected by the precision policy, the source balance is too low, a lock
    /// wait times out, or the credit would overflow. Both account holders are
    /// notified after the locks are released; notification failures are logged
    /// and do not affect the result.
    ///
    /// A self-transfer takes the account's lock once and leaves the balance unchanged.
    #[instrument(
        skip(self, request),
        fields(from = %request.from_account_id, to = %request.to_account_id, amount = %request.amount)
    )]
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferResult> {
        debug!("validating");
        let from = self.resolve(&request.from_account_id).await?;
        let to = self.resolve(&request.to_account_id).await?;
        let amount = self.config.precision.validate(request.amount)?;

        let committed = {
            let held = self.lock_pair(from.id(), to.id()).await?;
            debug!("locks held");
            self.apply(&held, &from, &to, amount)?
        };

        let result = TransferResult {
            from_account_id: from.id().clone(),
            to_account_id: to.id().clone(),
            amount,
            resulting_balance: committed.from_balance,
        };
        info!(resulting_balance = %result.resulting_balance, "transfer committed");

        self.notify(&from, &to, amount, &committed).await;
        Ok(result)
    }

    /// Reads the balances of `account_ids` while holding all of their locks.
    ///
    /// Locks are taken in ascending id order, the same order transfers use, and
    /// are all held while the balances are read, so a snapshot never shows a
    /// debit without its credit. The result is sorted by id with duplicates removed.
    #[instrument(skip_all, fields(accounts = account_ids.len()))]
    pub async fn snapshot(&self, account_ids: &[AccountId]) -> Result<Vec<(AccountId, Balance)>> {
        let mut ids = account_ids.to_vec();
        ids.sort();
        ids.dedup();

        let mut accounts = Vec::with_capacity(ids.len());
        for id in &ids {
            accounts.push(self.resolve(id).await?);
        }

        let mut guards = Vec::with_capacity(ids.len());
        for id in &ids {
            guards.push(self.locks.acquire(id).lock(self.config.lock_timeout).await?);
        }
        let balances = accounts
            .iter()
            .map(|account| (account.id().clone(), account.balance()))
            .collect();
        drop(guards);

        Ok(balances)
    }

    async fn resolve(&self, account_id: &AccountId) -> Result<Arc<Account>> {
        self.accounts
            .get(account_id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.clone()))
    }

    /// Locks both accounts, lower id first. If the second wait fails, the first
    /// guard is dropped on the way out.
    async fn lock_pair(&self, a: &AccountId, b: &AccountId) -> Result<HeldLocks> {
        let timeout = self.config.lock_timeout;
        if a == b {
            let guard = self.locks.acquire(a).lock(timeout).await?;
            return Ok(HeldLocks::Single(guard));
        }

        let (lower, higher) = if a < b { (a, b) } else { (b, a) };
        let first = self.locks.acquire(lower).lock(timeout).await?;
        let second = self.locks.acquire(higher).lock(timeout).await?;
        Ok(HeldLocks::Pair(first, second))
    }

    /// Checks funds and writes both balances. Both new balances are computed
    /// before either is written, so an error here leaves the ledger untouched.
    fn apply(
        &self,
        held: &HeldLocks,
        from: &Account,
        to: &Account,
        amount: Amount,
    ) -> Result<Committed> {
        debug_assert!(held.covers(from.id()) && held.covers(to.id()));

        let from_before = from.balance();
        let insufficient = || LedgerError::InsufficientFunds {
            account: from.id().clone(),
            balance: from_before.value(),
            requested: amount.value(),
        };
        let from_after = from_before.checked_debit(amount).ok_or_else(insufficient)?;

        if from.id() == to.id() {
            debug!("self-transfer, balance unchanged");
            return Ok(Committed {
                from_balance: from_before,
                to_balance: from_before,
            });
        }

        let to_after = to
            .balance()
            .checked_credit(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow(to.id().clone()))?;

        debug!("mutating");
        from.set_balance(from_after);
        to.set_balance(to_after);

        Ok(Committed {
            from_balance: from_after,
            to_balance: to_after,
        })
    }

    async fn notify(&self, from: &Account, to: &Account, amount: Amount, committed: &Committed) {
        let debit = format!(
            "Amount debited {} from your account to {}. Your current balance is {}",
            amount,
            to.id(),
            committed.from_balance
        );
        if let Err(e) = self.notifier.notify(from, &debit).await {
            warn!(account = %from.id(), error = %e, "failed to notify account holder");
        }

        let credit = format!(
            "Amount credited {} by {} to your account {}. Your current balance is {}",
            amount,
            from.id(),
            to.id(),
            committed.to_balance
        );
        if let Err(e) = self.notifier.notify(to, &credit).await {
            warn!(account = %to.id(), error = %e, "failed to notify account holder");
        }
    }
}
