//! Match state machine: confirm, reject, and manual linking
//!
//! Transitions: `Pending`/`Divergent` -> `Confirmed` or `Rejected`.
//! Both end states are terminal. Confirming flips the linked statement
//! line and transaction to reconciled; rejecting leaves them untouched
//! so they stay available for future matching.

use bigdecimal::BigDecimal;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::traits::{ReconciliationRepository, StatementRepository};
use crate::types::*;
use crate::utils::validation::{validate_entity_id, validate_notes};

/// Input for manually linking a statement line to a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct ManualLinkRequest {
    pub statement_line_id: String,
    pub transaction_kind: TransactionKind,
    pub transaction_id: String,
    /// Amount deducted from the raw difference (fees, agreed discounts)
    pub adjustment_amount: BigDecimal,
    pub notes: Option<String>,
}

/// The persisted record of pairings and the state machine governing
/// their transitions
pub struct MatchLedger<S: StatementRepository, R: ReconciliationRepository> {
    pub(crate) statements: S,
    pub(crate) matches: R,
}

impl<S: StatementRepository, R: ReconciliationRepository> MatchLedger<S, R> {
    pub fn new(statements: S, matches: R) -> Self {
        Self {
            statements,
            matches,
        }
    }

    /// Get a match by ID, returning an error if not found
    pub async fn get_match_required(&self, match_id: &str) -> ReconResult<ReconciliationMatch> {
        self.matches
            .get_match(match_id)
            .await?
            .ok_or_else(|| ReconciliationError::NotFound(format!("match '{match_id}'")))
    }

    /// Confirm an open match
    ///
    /// Writes the match status first, then flips the statement line and
    /// transaction to reconciled as a second step. When that second step
    /// fails the stores are inconsistent and the error is surfaced as
    /// [`ReconciliationError::PartialConfirm`]; the side effects are
    /// never silently dropped.
    pub async fn confirm(&mut self, match_id: &str) -> ReconResult<ReconciliationMatch> {
        let mut record = self.get_match_required(match_id).await?;

        match record.status {
            MatchStatus::Confirmed => {
                return Err(ReconciliationError::AlreadyConfirmed(format!(
                    "match '{match_id}' is already confirmed"
                )));
            }
            MatchStatus::Rejected => {
                return Err(ReconciliationError::Validation(format!(
                    "match '{match_id}' was rejected and cannot be confirmed"
                )));
            }
            MatchStatus::Pending | MatchStatus::Divergent => {}
        }

        let confirmed_at = Utc::now().naive_utc();
        self.matches
            .update_match_status(match_id, MatchStatus::Confirmed, Some(confirmed_at), None)
            .await?;

        if let Err(err) = self.mark_sides_reconciled(&record).await {
            warn!(
                match_id,
                error = %err,
                "match confirmed but entity status update failed"
            );
            return Err(ReconciliationError::PartialConfirm {
                match_id: match_id.to_string(),
                cause: err.to_string(),
            });
        }

        record.status = MatchStatus::Confirmed;
        record.confirmed_at = Some(confirmed_at);
        info!(
            match_id,
            statement_line_id = %record.statement_line_id,
            transaction_id = %record.transaction_id,
            "reconciliation confirmed"
        );
        Ok(record)
    }

    /// Second step of a confirm: flip both sides of the pairing to
    /// reconciled
    async fn mark_sides_reconciled(&mut self, record: &ReconciliationMatch) -> ReconResult<()> {
        self.statements
            .update_statement_status(&record.statement_line_id, StatementStatus::Reconciled)
            .await?;
        self.statements
            .update_transaction_status(&record.transaction_id, TransactionStatus::Reconciled)
            .await?;
        Ok(())
    }

    /// Reject an open match, optionally recording the reason
    ///
    /// The statement line and transaction keep their current status.
    pub async fn reject(&mut self, match_id: &str, reason: Option<String>) -> ReconResult<()> {
        if let Some(reason) = reason.as_deref() {
            validate_notes(reason)?;
        }
        let record = self.get_match_required(match_id).await?;

        match record.status {
            MatchStatus::Confirmed => {
                return Err(ReconciliationError::Validation(format!(
                    "match '{match_id}' is confirmed and cannot be rejected"
                )));
            }
            MatchStatus::Rejected => {
                return Err(ReconciliationError::Validation(format!(
                    "match '{match_id}' is already rejected"
                )));
            }
            MatchStatus::Pending | MatchStatus::Divergent => {}
        }

        self.matches
            .update_match_status(match_id, MatchStatus::Rejected, None, reason)
            .await?;
        info!(match_id, "reconciliation rejected");
        Ok(())
    }

    /// Link a statement line to a transaction by hand, bypassing the
    /// pending review step
    ///
    /// The amount difference is `|statement| - |transaction| - adjustment`
    /// and keeps its sign: negative means the bank moved less than
    /// expected after the adjustment. The match is created divergent when
    /// the difference is nonzero and confirmed immediately either way.
    pub async fn manual_link(
        &mut self,
        request: ManualLinkRequest,
    ) -> ReconResult<ReconciliationMatch> {
        validate_entity_id(&request.statement_line_id, "Statement line ID")?;
        validate_entity_id(&request.transaction_id, "Transaction ID")?;
        if let Some(notes) = request.notes.as_deref() {
            validate_notes(notes)?;
        }

        let line = self
            .statements
            .get_statement_line(&request.statement_line_id)
            .await?
            .ok_or_else(|| {
                ReconciliationError::NotFound(format!(
                    "statement line '{}'",
                    request.statement_line_id
                ))
            })?;
        let txn = self
            .statements
            .get_transaction(&request.transaction_id)
            .await?
            .ok_or_else(|| {
                ReconciliationError::NotFound(format!("transaction '{}'", request.transaction_id))
            })?;

        if txn.kind != request.transaction_kind {
            return Err(ReconciliationError::Validation(format!(
                "transaction '{}' is not a {:?}",
                txn.id, request.transaction_kind
            )));
        }
        if line.reconciliation_status == StatementStatus::Reconciled {
            return Err(ReconciliationError::Validation(format!(
                "statement line '{}' is already reconciled",
                line.id
            )));
        }
        if txn.reconciliation_status == TransactionStatus::Reconciled {
            return Err(ReconciliationError::Validation(format!(
                "transaction '{}' is already reconciled",
                txn.id
            )));
        }

        let amount_difference =
            line.amount.abs() - txn.expected_amount.abs() - request.adjustment_amount;
        let date_difference_days = (line.transaction_date - txn.settlement_date())
            .num_days()
            .abs();
        let status = if amount_difference != BigDecimal::from(0) {
            MatchStatus::Divergent
        } else {
            MatchStatus::Pending
        };

        let record = ReconciliationMatch {
            id: Uuid::new_v4().to_string(),
            statement_line_id: line.id,
            transaction_id: txn.id,
            transaction_kind: txn.kind,
            amount_difference,
            date_difference_days,
            // A human asserted the pairing; it is exact by definition
            confidence_score: 100,
            status,
            created_at: Utc::now().naive_utc(),
            confirmed_at: None,
            notes: request.notes,
        };

        let created = self.matches.create_match(&record).await?;
        self.confirm(&created.id).await
    }
}
