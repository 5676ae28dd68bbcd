//! Input and output formats used by the `ledger` binary.

pub mod csv;
pub mod journal;
