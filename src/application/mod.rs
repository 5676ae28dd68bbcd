//! Application layer containing the transfer engine.
//!
//! This module defines the `TransferCoordinator`, the single entry point for
//! moving funds, and the `LockRegistry` that gives every account its own lock.

pub mod coordinator;
pub mod lock_registry;
