use clap::Parser;
use ledger_transfer::application::coordinator::TransferCoordinator;
use ledger_transfer::config::Cli;
use ledger_transfer::domain::ports::{AccountStoreRef, NotifierRef};
use ledger_transfer::domain::transfer::{TransferRequest, TransferResult};
use ledger_transfer::infrastructure::in_memory::InMemoryAccountStore;
use ledger_transfer::infrastructure::notifier::LoggingNotifier;
use ledger_transfer::interfaces::csv::account_reader::AccountReader;
use ledger_transfer::interfaces::csv::balance_writer::BalanceWriter;
use ledger_transfer::interfaces::csv::transfer_reader::TransferReader;
use ledger_transfer::interfaces::journal::{JournalEntry, JournalWriter};
use ledger_transfer::telemetry;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufWriter};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};

type Outcome = (TransferRequest, ledger_transfer::error::Result<TransferResult>);

/// Tallies transfer outcomes and mirrors them to the optional journal.
struct BatchReport {
    committed: usize,
    rejected: usize,
    journal: Option<JournalWriter<BufWriter<File>>>,
}

impl BatchReport {
    fn record(&mut self, joined: std::result::Result<Outcome, JoinError>) -> Result<()> {
        let (request, outcome) = joined.into_diagnostic()?;
        match &outcome {
            Ok(_) => self.committed += 1,
            Err(e) if e.is_rejection() => {
                self.rejected += 1;
                warn!(
                    from = %request.from_account_id,
                    to = %request.to_account_id,
                    amount = %request.amount,
                    error = %e,
                    "Transfer rejected"
                );
            }
            Err(e) => {
                self.rejected += 1;
                error!(
                    from = %request.from_account_id,
                    to = %request.to_account_id,
                    amount = %request.amount,
                    error = %e,
                    "Transfer failed"
                );
            }
        }
        if let Some(journal) = self.journal.as_mut() {
            journal
                .append(&JournalEntry::from_outcome(&request, &outcome))
                .into_diagnostic()?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    // Load opening balances
    let store: AccountStoreRef = Arc::new(InMemoryAccountStore::new());
    let file = File::open(&cli.accounts).into_diagnostic()?;
    for account in AccountReader::new(file).accounts() {
        match account {
            Ok(account) => {
                if let Err(e) = store.create(account).await {
                    warn!(error = %e, "Error loading account");
                }
            }
            Err(e) => warn!(error = %e, "Error reading account"),
        }
    }

    let notifier: NotifierRef = Arc::new(LoggingNotifier::new());
    let coordinator = Arc::new(TransferCoordinator::new(
        store.clone(),
        notifier,
        cli.transfer_config(),
    ));

    let journal = match &cli.journal {
        Some(path) => Some(JournalWriter::new(BufWriter::new(
            File::create(path).into_diagnostic()?,
        ))),
        None => None,
    };
    let mut report = BatchReport {
        committed: 0,
        rejected: 0,
        journal,
    };

    // Run transfers, at most `workers` in flight
    let permits = Arc::new(Semaphore::new(usize::from(cli.workers)));
    let mut tasks = JoinSet::new();
    let file = File::open(&cli.transfers).into_diagnostic()?;
    for request in TransferReader::new(file).transfers() {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Error reading transfer");
                continue;
            }
        };

        let permit = permits.clone().acquire_owned().await.into_diagnostic()?;
        let coordinator = coordinator.clone();
        tasks.spawn(async move {
            let outcome = coordinator.transfer(request.clone()).await;
            drop(permit);
            (request, outcome)
        });

        while let Some(joined) = tasks.try_join_next() {
            report.record(joined)?;
        }
    }
    while let Some(joined) = tasks.join_next().await {
        report.record(joined)?;
    }

    if let Some(journal) = report.journal.as_mut() {
        journal.flush().into_diagnostic()?;
    }
    info!(
        committed = report.committed,
        rejected = report.rejected,
        locks = coordinator.lock_registry().len(),
        "Batch complete"
    );

    // Output final balances
    let ids: Vec<_> = store
        .all_accounts()
        .await
        .into_diagnostic()?
        .iter()
        .map(|account| account.id().clone())
        .collect();
    let balances = coordinator.snapshot(&ids).await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    writer.write_balances(&balances).into_diagnostic()?;

    Ok(())
}
