//! Ledger module containing the match state machine and the
//! reconciliation orchestrator

pub mod core;
pub mod matches;

pub use core::*;
pub use matches::*;
