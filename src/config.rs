//! Command-line and environment configuration for the `ledger` binary.

use crate::application::coordinator::TransferConfig;
use crate::domain::transfer::PrecisionPolicy;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Applies a batch of funds transfers to an in-memory ledger", long_about = None)]
pub struct Cli {
    /// Transfers CSV file (`from,to,amount`)
    pub transfers: PathBuf,

    /// Opening balances CSV file (`account,balance`)
    #[arg(long, env = "LEDGER_ACCOUNTS")]
    pub accounts: PathBuf,

    /// Maximum number of transfers in flight at once
    #[arg(long, env = "LEDGER_WORKERS", default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: u16,

    /// Give up on a transfer after waiting this long for an account lock
    #[arg(long, env = "LEDGER_LOCK_TIMEOUT_MS")]
    pub lock_timeout_ms: Option<u64>,

    /// Accepted amount precision: `whole`, `unrestricted`, or a number of decimal places
    #[arg(long, env = "LEDGER_PRECISION", default_value_t = PrecisionPolicy::default())]
    pub precision: PrecisionPolicy,

    /// Write one JSON line per transfer outcome to this file
    #[arg(long, env = "LEDGER_JOURNAL")]
    pub journal: Option<PathBuf>,
}

impl Cli {
    pub fn transfer_config(&self) -> TransferConfig {
        TransferConfig {
            precision: self.precision,
            lock_timeout: self.lock_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ledger", "transfers.csv", "--accounts", "accounts.csv"])
            .unwrap();
        let config = cli.transfer_config();
        assert_eq!(cli.workers, 8);
        assert_eq!(config.precision, PrecisionPolicy::MaxScale(4));
        assert_eq!(config.lock_timeout, None);
        assert!(cli.journal.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "ledger",
            "transfers.csv",
            "--accounts",
            "accounts.csv",
            "--workers",
            "2",
            "--lock-timeout-ms",
            "250",
            "--precision",
            "whole",
        ])
        .unwrap();
        let config = cli.transfer_config();
        assert_eq!(cli.workers, 2);
        assert_eq!(config.precision, PrecisionPolicy::WholeUnits);
        assert_eq!(config.lock_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_rejects_zero_workers_and_bad_precision() {
        let zero = Cli::try_parse_from([
            "ledger",
            "t.csv",
            "--accounts",
            "a.csv",
            "--workers",
            "0",
        ]);
        assert!(zero.is_err());

        let bad = Cli::try_parse_from([
            "ledger",
            "t.csv",
            "--accounts",
            "a.csv",
            "--precision",
            "cents",
        ]);
        assert!(bad.is_err());
    }
}
