#![allow(dead_code)]

use async_trait::async_trait;
use ledger_transfer::application::coordinator::{TransferConfig, TransferCoordinator};
use ledger_transfer::application::lock_registry::LockRegistry;
use ledger_transfer::domain::account::{Account, AccountId, Balance};
use ledger_transfer::domain::ports::{AccountStore, Notifier};
use ledger_transfer::error::{LedgerError, Result};
use ledger_transfer::infrastructure::in_memory::InMemoryAccountStore;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<(AccountId, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, account: &Account, message: &str) -> Result<()> {
        self.messages
            .lock()
            .push((account.id().clone(), message.to_string()));
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _account: &Account, _message: &str) -> Result<()> {
        Err(LedgerError::NotificationFailed("unreachable".to_string()))
    }
}

pub struct Ledger {
    pub store: Arc<InMemoryAccountStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub coordinator: Arc<TransferCoordinator>,
}

impl Ledger {
    pub async fn balance(&self, id: &str) -> Balance {
        self.store
            .get(&AccountId::from(id))
            .await
            .unwrap()
            .expect("account exists")
            .balance()
    }

    pub async fn total(&self) -> Decimal {
        self.store
            .all_accounts()
            .await
            .unwrap()
            .iter()
            .map(|account| account.balance().value())
            .sum()
    }
}

pub async fn ledger(balances: &[(&str, Decimal)]) -> Ledger {
    ledger_with_config(balances, TransferConfig::default()).await
}

pub async fn ledger_with_config(balances: &[(&str, Decimal)], config: TransferConfig) -> Ledger {
    build_ledger(balances, LockRegistry::global(), config).await
}

/// A ledger whose coordinator has a registry of its own, for tests that
/// inspect the registry.
pub async fn isolated_ledger(balances: &[(&str, Decimal)]) -> Ledger {
    build_ledger(
        balances,
        Arc::new(LockRegistry::new()),
        TransferConfig::default(),
    )
    .await
}

async fn build_ledger(
    balances: &[(&str, Decimal)],
    locks: Arc<LockRegistry>,
    config: TransferConfig,
) -> Ledger {
    let store = Arc::new(InMemoryAccountStore::new());
    for (id, balance) in balances {
        store
            .create(Account::new(*id, Balance::new(*balance)).unwrap())
            .await
            .unwrap();
    }
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = Arc::new(TransferCoordinator::with_lock_registry(
        store.clone(),
        notifier.clone(),
        locks,
        config,
    ));
    Ledger {
        store,
        notifier,
        coordinator,
    }
}

/// Writes `lines` to a temporary CSV file.
pub fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}
