//! Reconciliation orchestrator combining the matching pipeline with the
//! match ledger

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::matching::{generate_candidates, resolve, MatchLimits, ToleranceConfig};
use crate::traits::{ReconciliationRepository, StatementRepository};
use crate::types::*;
use crate::utils::validation::validate_entity_id;

use super::matches::{ManualLinkRequest, MatchLedger};

/// Validated input for one auto-reconciliation run
#[derive(Debug, Clone, PartialEq)]
pub struct AutoReconcileParams {
    /// Bank account whose statement lines are matched
    pub account_id: String,
    /// Business unit owning the expected transactions
    pub unit_id: String,
    pub tolerance: ToleranceConfig,
    pub limits: MatchLimits,
}

impl AutoReconcileParams {
    /// Build params with the default working-set limits
    pub fn new(account_id: String, unit_id: String, tolerance: ToleranceConfig) -> Self {
        Self {
            account_id,
            unit_id,
            tolerance,
            limits: MatchLimits::default(),
        }
    }

    /// Validate the run input; violations fail before any data is loaded
    pub fn validate(&self) -> ReconResult<()> {
        validate_entity_id(&self.account_id, "Account ID")?;
        validate_entity_id(&self.unit_id, "Unit ID")?;
        self.tolerance.validate()
    }
}

/// Entry point for the reconciliation subsystem
///
/// Hosts construct one engine over their repository implementations and
/// call the four public operations: [`auto_reconcile`], confirm, reject,
/// and manual link. Every operation takes plain data and returns a typed
/// [`ReconResult`]; wrap in [`Envelope`] where a uniform
/// `{success, data, error}` shape is needed.
///
/// [`auto_reconcile`]: ReconciliationEngine::auto_reconcile
pub struct ReconciliationEngine<S: StatementRepository, R: ReconciliationRepository> {
    ledger: MatchLedger<S, R>,
}

impl<S: StatementRepository, R: ReconciliationRepository> ReconciliationEngine<S, R> {
    /// Create a new engine over the given repositories
    pub fn new(statements: S, matches: R) -> Self {
        Self {
            ledger: MatchLedger::new(statements, matches),
        }
    }

    /// Propose matches for one account within the configured tolerances
    ///
    /// Loads up to the configured limits of statement lines (any status,
    /// so already-reconciled lines can be counted) and eligible
    /// transactions, runs candidate generation and assignment resolution,
    /// and persists every surviving pairing as a `Pending` match record.
    /// Nothing is confirmed here; confirmation is a separate,
    /// human-triggered step. Empty collections are a normal result, not
    /// an error.
    pub async fn auto_reconcile(
        &mut self,
        params: &AutoReconcileParams,
    ) -> ReconResult<AutoReconcileOutcome> {
        params.validate()?;

        let statement_lines = self
            .ledger
            .statements
            .list_statement_lines(&params.account_id, params.limits.statement_lines)
            .await?;
        let transactions = self
            .ledger
            .statements
            .list_eligible_transactions(&params.unit_id, params.limits.transactions)
            .await?;
        debug!(
            account_id = %params.account_id,
            statements = statement_lines.len(),
            transactions = transactions.len(),
            "loaded working set"
        );

        let mut summary = ReconciliationSummary {
            total_statements: statement_lines.len(),
            total_transactions: transactions.len(),
            matches_found: 0,
            already_reconciled: statement_lines
                .iter()
                .filter(|line| line.reconciliation_status == StatementStatus::Reconciled)
                .count(),
        };

        if statement_lines.is_empty() || transactions.is_empty() {
            return Ok(AutoReconcileOutcome {
                matches: Vec::new(),
                summary,
            });
        }

        let candidates =
            generate_candidates(&statement_lines, &transactions, &params.tolerance, &params.limits);
        let assignments = resolve(&candidates);

        let created_at = Utc::now().naive_utc();
        let mut matches = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let record = ReconciliationMatch {
                id: Uuid::new_v4().to_string(),
                statement_line_id: assignment.statement_line_id,
                transaction_id: assignment.transaction_id,
                transaction_kind: assignment.transaction_kind,
                amount_difference: assignment.amount_difference,
                date_difference_days: assignment.date_difference_days,
                confidence_score: assignment.confidence_score,
                status: MatchStatus::Pending,
                created_at,
                confirmed_at: None,
                notes: None,
            };
            matches.push(self.ledger.matches.create_match(&record).await?);
        }

        summary.matches_found = matches.len();
        info!(
            account_id = %params.account_id,
            matches_found = summary.matches_found,
            already_reconciled = summary.already_reconciled,
            "auto-reconcile run finished"
        );

        Ok(AutoReconcileOutcome { matches, summary })
    }

    /// Confirm a proposed match; see [`MatchLedger::confirm`]
    pub async fn confirm_reconciliation(
        &mut self,
        match_id: &str,
    ) -> ReconResult<ReconciliationMatch> {
        self.ledger.confirm(match_id).await
    }

    /// Reject a proposed match; see [`MatchLedger::reject`]
    pub async fn reject_reconciliation(
        &mut self,
        match_id: &str,
        reason: Option<String>,
    ) -> ReconResult<()> {
        self.ledger.reject(match_id, reason).await
    }

    /// Link a statement line to a transaction by hand; see
    /// [`MatchLedger::manual_link`]
    pub async fn manual_link(
        &mut self,
        request: ManualLinkRequest,
    ) -> ReconResult<ReconciliationMatch> {
        self.ledger.manual_link(request).await
    }
}
