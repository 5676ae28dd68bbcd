use crate::domain::account::AccountId;
use crate::domain::transfer::{TransferRequest, TransferResult};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// One line of the transfer journal.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JournalEntry {
    Committed(TransferResult),
    Rejected {
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Decimal,
        reason: String,
    },
}

impl JournalEntry {
    pub fn from_outcome(request: &TransferRequest, outcome: &Result<TransferResult>) -> Self {
        match outcome {
            Ok(result) => JournalEntry::Committed(result.clone()),
            Err(error) => JournalEntry::rejected(request, error),
        }
    }

    pub fn rejected(request: &TransferRequest, error: &LedgerError) -> Self {
        JournalEntry::Rejected {
            from_account_id: request.from_account_id.clone(),
            to_account_id: request.to_account_id.clone(),
            amount: request.amount,
            reason: error.to_string(),
        }
    }
}

/// Appends journal entries as JSON lines.
pub struct JournalWriter<W: Write> {
    sink: W,
}

impl<W: Write> JournalWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn append(&mut self, entry: &JournalEntry) -> Result<()> {
        serde_json::to_writer(&mut self.sink, entry)?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}
