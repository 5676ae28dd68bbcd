use crate::domain::transfer::TransferRequest;
use crate::error::Result;
use std::io::Read;

/// Reads transfer requests from CSV rows under a `from,to,amount` header.
///
/// `from` and `to` are account ids taken as written. `amount` must parse as a
/// decimal; whether it is an acceptable amount is decided when the transfer runs.
/// A row that cannot be read yields an error and reading continues with the next.
pub struct TransferReader<R: Read> {
    source: R,
}

impl<R: Read> TransferReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn transfers(self) -> impl Iterator<Item = Result<TransferRequest>> {
        super::rows(self.source)
    }
}
