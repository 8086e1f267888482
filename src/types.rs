//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Reconciliation state of a bank-statement line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementStatus {
    /// Not yet linked to a transaction
    Pending,
    /// Linked to a transaction through a confirmed match
    Reconciled,
}

/// Reconciliation state of an expected transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Recorded but not yet settled
    Pending,
    /// Settlement planned for a known date
    Scheduled,
    /// Settled and linked to a statement line
    Reconciled,
}

impl TransactionStatus {
    /// Whether a transaction in this state may still be matched
    pub fn is_matchable(&self) -> bool {
        matches!(self, TransactionStatus::Pending | TransactionStatus::Scheduled)
    }
}

/// Flow direction of an expected transaction
///
/// Receivables are expected inflows and may only pair with credit
/// statement lines; payables are expected outflows and may only pair
/// with debit statement lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Receivable,
    Payable,
}

/// Lifecycle state of a reconciliation match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Proposed by the auto-match run, awaiting human review
    Pending,
    /// Amount difference nonzero but within tolerance; awaiting review
    /// under the same transition rules as `Pending`
    Divergent,
    /// Accepted; terminal
    Confirmed,
    /// Discarded; terminal
    Rejected,
}

impl MatchStatus {
    /// Whether a match in this state may still transition
    pub fn is_open(&self) -> bool {
        matches!(self, MatchStatus::Pending | MatchStatus::Divergent)
    }
}

/// One row of an imported bank account extract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Unique identifier of the statement line
    pub id: String,
    /// Bank account the line belongs to
    pub account_id: String,
    /// Date the movement appeared on the statement
    pub transaction_date: NaiveDate,
    /// Signed amount: positive = credit/inflow, negative = debit/outflow
    pub amount: BigDecimal,
    /// Free-text description from the bank feed
    pub description: String,
    /// Current reconciliation state
    pub reconciliation_status: StatementStatus,
}

impl StatementLine {
    /// The transaction kind this line is allowed to pair with
    pub fn compatible_kind(&self) -> TransactionKind {
        if self.amount >= BigDecimal::from(0) {
            TransactionKind::Receivable
        } else {
            TransactionKind::Payable
        }
    }
}

/// An internally recorded expected cash movement (receivable or payable),
/// independent of the bank feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedTransaction {
    /// Unique identifier of the transaction
    pub id: String,
    /// Business unit that owns the transaction
    pub unit_id: String,
    /// Bank account the settlement is expected on, when known
    pub account_id: Option<String>,
    /// Expected settlement amount (absolute value)
    pub expected_amount: BigDecimal,
    /// Expected settlement date, when one was recorded
    pub expected_date: Option<NaiveDate>,
    /// Nominal date of the transaction (due date / issue date)
    pub nominal_date: NaiveDate,
    /// Date the settlement actually happened, once known
    pub actual_settlement_date: Option<NaiveDate>,
    /// Current reconciliation state
    pub reconciliation_status: TransactionStatus,
    /// Inflow (receivable) or outflow (payable)
    pub kind: TransactionKind,
    /// Counterparty name, carried for display only; never scored
    pub counterparty_name: Option<String>,
}

impl ExpectedTransaction {
    /// Date used for tolerance comparison: the expected settlement date,
    /// falling back to the nominal date when no expectation was recorded
    pub fn settlement_date(&self) -> NaiveDate {
        self.expected_date.unwrap_or(self.nominal_date)
    }
}

/// The link record pairing one statement line to one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationMatch {
    /// Unique identifier of the match
    pub id: String,
    /// Statement line side of the pairing
    pub statement_line_id: String,
    /// Transaction side of the pairing
    pub transaction_id: String,
    /// Kind of the paired transaction
    pub transaction_kind: TransactionKind,
    /// Absolute amount difference for auto matches; signed for manual
    /// links (`|stmt| - |txn| - adjustment`, sign preserved)
    pub amount_difference: BigDecimal,
    /// Absolute day difference between statement and settlement dates
    pub date_difference_days: i64,
    /// Match quality, 0-100, 100 = exact
    pub confidence_score: u8,
    /// Current lifecycle state
    pub status: MatchStatus,
    /// When the match record was created
    pub created_at: NaiveDateTime,
    /// When the match was confirmed, once it has been
    pub confirmed_at: Option<NaiveDateTime>,
    /// Free-form notes (manual-link annotations, rejection reasons)
    pub notes: Option<String>,
}

impl ReconciliationMatch {
    /// Whether the pairing carries a nonzero amount difference and so
    /// deserves a visual flag before confirmation
    pub fn is_divergent(&self) -> bool {
        self.amount_difference != BigDecimal::from(0)
    }
}

/// Counts describing one `auto_reconcile` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Statement lines loaded for the account (any status)
    pub total_statements: usize,
    /// Eligible transactions loaded for the owning unit
    pub total_transactions: usize,
    /// Proposals produced by this run
    pub matches_found: usize,
    /// Loaded statement lines that were already reconciled
    pub already_reconciled: usize,
}

/// Result of one `auto_reconcile` run: the proposed matches (all in
/// `Pending` status) plus the run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoReconcileOutcome {
    pub matches: Vec<ReconciliationMatch>,
    pub summary: ReconciliationSummary,
}

/// Uniform `{success, data, error}` envelope for hosts that expose the
/// orchestrator operations over a plain-data boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> From<ReconResult<T>> for Envelope<T> {
    fn from(result: ReconResult<T>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(err) => Self {
                success: false,
                data: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Errors that can occur in the reconciliation system
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already confirmed: {0}")]
    AlreadyConfirmed(String),
    #[error("Data access error: {0}")]
    DataAccess(String),
    /// The match-status write succeeded but the follow-up statement or
    /// transaction status write failed, leaving the stores inconsistent.
    /// The caller must reconcile manually.
    #[error("Partial confirm of match '{match_id}': {cause}")]
    PartialConfirm { match_id: String, cause: String },
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconciliationError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn line(amount: i64) -> StatementLine {
        StatementLine {
            id: "stmt1".to_string(),
            account_id: "acc1".to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            amount: BigDecimal::from(amount),
            description: "PIX TRANSFER".to_string(),
            reconciliation_status: StatementStatus::Pending,
        }
    }

    #[test]
    fn credit_lines_pair_with_receivables() {
        assert_eq!(line(150).compatible_kind(), TransactionKind::Receivable);
        assert_eq!(line(0).compatible_kind(), TransactionKind::Receivable);
        assert_eq!(line(-150).compatible_kind(), TransactionKind::Payable);
    }

    #[test]
    fn settlement_date_prefers_expected() {
        let mut txn = ExpectedTransaction {
            id: "txn1".to_string(),
            unit_id: "unit1".to_string(),
            account_id: None,
            expected_amount: BigDecimal::from(150),
            expected_date: Some(NaiveDate::from_ymd_opt(2025, 1, 17).unwrap()),
            nominal_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            actual_settlement_date: None,
            reconciliation_status: TransactionStatus::Pending,
            kind: TransactionKind::Receivable,
            counterparty_name: None,
        };
        assert_eq!(
            txn.settlement_date(),
            NaiveDate::from_ymd_opt(2025, 1, 17).unwrap()
        );

        txn.expected_date = None;
        assert_eq!(
            txn.settlement_date(),
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
        );
    }

    #[test]
    fn envelope_reflects_result() {
        let ok: Envelope<u8> = Envelope::from(Ok(7));
        assert!(ok.success);
        assert_eq!(ok.data, Some(7));
        assert!(ok.error.is_none());

        let err: Envelope<u8> = Envelope::from(Err(ReconciliationError::Validation(
            "Account ID cannot be empty".to_string(),
        )));
        assert!(!err.success);
        assert!(err.data.is_none());
        assert_eq!(
            err.error.as_deref(),
            Some("Validation error: Account ID cannot be empty")
        );
    }

    #[test]
    fn envelope_serializes_uniform_shape() {
        let env: Envelope<u8> = Envelope::from(Ok(42));
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json["error"].is_null());
    }

    #[test]
    fn terminal_match_states_are_closed() {
        assert!(MatchStatus::Pending.is_open());
        assert!(MatchStatus::Divergent.is_open());
        assert!(!MatchStatus::Confirmed.is_open());
        assert!(!MatchStatus::Rejected.is_open());
    }
}
