pub mod account_reader;
pub mod balance_writer;
pub mod transfer_reader;

use crate::error::{LedgerError, Result};
use serde::de::DeserializeOwned;
use std::io::Read;

/// Lazily deserializes the rows of a headed CSV source into `T`.
///
/// Fields are matched by header name and trimmed. Extra trailing fields are
/// ignored and missing ones fail that row. Every bad row yields its own error and
/// the rows after it are still read.
fn rows<R: Read, T: DeserializeOwned>(source: R) -> impl Iterator<Item = Result<T>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source)
        .into_deserialize()
        .map(|row| row.map_err(LedgerError::from))
}
