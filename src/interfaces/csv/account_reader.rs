use crate::domain::account::{Account, AccountId, Balance};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct OpeningBalance {
    account: AccountId,
    balance: Decimal,
}

/// Reads opening balances from a CSV source with an `account,balance` header.
pub struct AccountReader<R: Read> {
    source: R,
}

impl<R: Read> AccountReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Yields one `Account` per row. Rows with a negative balance are errors.
    pub fn accounts(self) -> impl Iterator<Item = Result<Account>> {
        super::rows(self.source).map(|row: Result<OpeningBalance>| {
            let row = row?;
            Account::new(row.account, Balance::new(row.balance))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reads_opening_balances() {
        let data = "account, balance\nId-1, 100\nId-2, 50.25";
        let accounts: Vec<Account> = AccountReader::new(data.as_bytes())
            .accounts()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].id().as_str(), "Id-1");
        assert_eq!(accounts[1].balance(), Balance::new(dec!(50.25)));
    }

    #[test]
    fn test_negative_opening_balance_is_an_error() {
        let data = "account, balance\nId-1, -1";
        let results: Vec<Result<Account>> = AccountReader::new(data.as_bytes()).accounts().collect();
        assert!(matches!(results[0], Err(LedgerError::InvalidAmount(_))));
    }
}
