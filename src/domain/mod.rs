//! Domain layer: ledger value types, transfer requests and results, and the
//! ports the engine consumes.

pub mod account;
pub mod ports;
pub mod transfer;
