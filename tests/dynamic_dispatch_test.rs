use ledger_transfer::domain::account::{Account, AccountId, Balance};
use ledger_transfer::domain::ports::{AccountStoreRef, NotifierRef};
use ledger_transfer::infrastructure::in_memory::InMemoryAccountStore;
use ledger_transfer::infrastructure::notifier::LoggingNotifier;
use rust_decimal_macros::dec;
use std::sync::Arc;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let account_store: AccountStoreRef = Arc::new(InMemoryAccountStore::new());
    let notifier: NotifierRef = Arc::new(LoggingNotifier::new());

    let account = Account::new("Id-1", Balance::new(dec!(100.0))).unwrap();

    // Verify Send + Sync by spawning tasks
    let store = account_store.clone();
    let as_handle = tokio::spawn(async move {
        store.create(account).await.unwrap();
        store.get(&AccountId::from("Id-1")).await.unwrap().unwrap()
    });

    let retrieved = as_handle.await.unwrap();
    assert_eq!(retrieved.balance(), Balance::new(dec!(100.0)));

    let n_handle = tokio::spawn(async move { notifier.notify(&retrieved, "hello").await });
    assert!(n_handle.await.unwrap().is_ok());

    assert_eq!(account_store.all_accounts().await.unwrap().len(), 1);
}
