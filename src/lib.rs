//! # Reconciliation Core
//!
//! A library for bank reconciliation auto-matching: pairing
//! bank-statement line items with expected financial transactions
//! (receivables and payables) within configurable value and date
//! tolerances, scoring the confidence of each pairing, resolving
//! competing candidates to a unique 1:1 assignment, and persisting the
//! result through an auditable confirm/reject workflow.
//!
//! ## Features
//!
//! - **Tolerance evaluation**: pure amount/date compatibility checks
//!   with a 0-100 confidence score
//! - **Candidate generation**: flow-direction aware scanning of all
//!   eligible pairings, with a capped working set
//! - **Assignment resolution**: deterministic best-candidate selection
//!   guaranteeing no statement line or transaction is matched twice
//! - **Match ledger**: pending/divergent/confirmed/rejected state
//!   machine with explicit partial-failure reporting
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   repositories
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::utils::MemoryStorage;
//! use reconciliation_core::{AutoReconcileParams, ReconciliationEngine, ToleranceConfig};
//! use bigdecimal::BigDecimal;
//! use std::str::FromStr;
//!
//! # async fn run() -> Result<(), reconciliation_core::ReconciliationError> {
//! let store = MemoryStorage::new();
//! let mut engine = ReconciliationEngine::new(store.clone(), store);
//!
//! let params = AutoReconcileParams::new(
//!     "acc-main".to_string(),
//!     "unit-downtown".to_string(),
//!     ToleranceConfig::new(BigDecimal::from_str("0.05").unwrap(), 3),
//! );
//! let outcome = engine.auto_reconcile(&params).await?;
//! for proposal in &outcome.matches {
//!     // review, then confirm or reject each proposal
//!     engine.confirm_reconciliation(&proposal.id).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod ledger;
pub mod matching;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use matching::*;
pub use traits::*;
pub use types::*;
