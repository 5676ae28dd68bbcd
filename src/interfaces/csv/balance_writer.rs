use crate::domain::account::{AccountId, Balance};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRecord<'a> {
    account: &'a str,
    balance: Decimal,
}

/// Writes account balances as `account,balance` CSV rows.
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes one row per balance, normalized (`70.00` is written as `70`).
    pub fn write_balances(&mut self, balances: &[(AccountId, Balance)]) -> Result<()> {
        for (account, balance) in balances {
            self.writer.serialize(BalanceRecord {
                account: account.as_str(),
                balance: balance.value().normalize(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_writes_header_and_rows() {
        let balances = vec![
            (AccountId::from("A"), Balance::new(dec!(70.00))),
            (AccountId::from("B"), Balance::new(dec!(80.5))),
        ];

        let mut out = Vec::new();
        BalanceWriter::new(&mut out).write_balances(&balances).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "account,balance\nA,70\nB,80.5\n"
        );
    }
}
