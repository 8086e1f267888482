//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::types::*;

/// Storage abstraction for statement lines and expected transactions
///
/// This trait lets the matching core work with any storage backend
/// (PostgreSQL, MySQL, SQLite, in-memory, a hosted API, etc.) by
/// implementing these methods.
#[async_trait]
pub trait StatementRepository: Send + Sync {
    /// List up to `limit` statement lines for an account, any status
    async fn list_statement_lines(
        &self,
        account_id: &str,
        limit: usize,
    ) -> ReconResult<Vec<StatementLine>>;

    /// Get a statement line by ID
    async fn get_statement_line(&self, id: &str) -> ReconResult<Option<StatementLine>>;

    /// List up to `limit` transactions of a unit that are still eligible
    /// for matching (status pending or scheduled)
    async fn list_eligible_transactions(
        &self,
        unit_id: &str,
        limit: usize,
    ) -> ReconResult<Vec<ExpectedTransaction>>;

    /// Get an expected transaction by ID
    async fn get_transaction(&self, id: &str) -> ReconResult<Option<ExpectedTransaction>>;

    /// Update the reconciliation status of a statement line
    async fn update_statement_status(
        &mut self,
        id: &str,
        status: StatementStatus,
    ) -> ReconResult<()>;

    /// Update the reconciliation status of an expected transaction
    async fn update_transaction_status(
        &mut self,
        id: &str,
        status: TransactionStatus,
    ) -> ReconResult<()>;
}

/// Storage abstraction for reconciliation match records
///
/// Implementations must enforce the confirm-uniqueness invariant: at most
/// one confirmed match per statement line and per transaction. A status
/// update that would confirm a second match over either side must fail
/// with [`ReconciliationError::AlreadyConfirmed`] so concurrent runs
/// cannot corrupt state.
#[async_trait]
pub trait ReconciliationRepository: Send + Sync {
    /// Persist a new match record
    async fn create_match(&mut self, m: &ReconciliationMatch) -> ReconResult<ReconciliationMatch>;

    /// Get a match by ID
    async fn get_match(&self, id: &str) -> ReconResult<Option<ReconciliationMatch>>;

    /// Update a match's status; `confirmed_at` is set on confirmation,
    /// `notes` replaces the stored notes when given
    async fn update_match_status(
        &mut self,
        id: &str,
        status: MatchStatus,
        confirmed_at: Option<NaiveDateTime>,
        notes: Option<String>,
    ) -> ReconResult<()>;

    /// Delete a match record
    async fn delete_match(&mut self, id: &str) -> ReconResult<()>;
}
