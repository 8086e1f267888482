//! Candidate generation: score every eligible statement/transaction pair

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::matching::tolerance::{evaluate, ToleranceConfig, Verdict};
use crate::types::*;

/// Default cap on statement lines considered per run
pub const DEFAULT_STATEMENT_LIMIT: usize = 100;
/// Default cap on transactions considered per run
pub const DEFAULT_TRANSACTION_LIMIT: usize = 100;

/// Caps on the working set of one matching run, bounding the pairwise
/// comparison cost
///
/// Exceeding a cap is not an error; entries beyond it are simply not
/// considered in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLimits {
    pub statement_lines: usize,
    pub transactions: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            statement_lines: DEFAULT_STATEMENT_LIMIT,
            transactions: DEFAULT_TRANSACTION_LIMIT,
        }
    }
}

/// One scored candidate pairing produced by the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub statement_line_id: String,
    pub transaction_id: String,
    pub transaction_kind: TransactionKind,
    /// Absolute difference between the unsigned amounts
    pub amount_difference: BigDecimal,
    /// Absolute day difference between statement and settlement dates
    pub date_difference_days: i64,
    /// 0-100, 100 = exact
    pub confidence_score: u8,
}

/// All candidates for one statement line, in evaluation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCandidates {
    pub statement_line_id: String,
    pub candidates: Vec<ScoredCandidate>,
}

/// Scan all eligible pairings and keep those within tolerance
///
/// Only pending statement lines and pending/scheduled transactions are
/// considered, and a line may only pair with transactions of its
/// compatible flow direction (credit with receivables, debit with
/// payables). Lines are processed sorted by `(transaction_date, id)` so
/// the downstream assignment is deterministic even when the input
/// collections arrive unordered. Incompatible pairs are skipped
/// silently.
///
/// The returned entries keep the processing order; lines without any
/// compatible transaction appear with an empty candidate list.
pub fn generate_candidates(
    statement_lines: &[StatementLine],
    transactions: &[ExpectedTransaction],
    cfg: &ToleranceConfig,
    limits: &MatchLimits,
) -> Vec<LineCandidates> {
    let mut pending_lines: Vec<&StatementLine> = statement_lines
        .iter()
        .filter(|line| line.reconciliation_status == StatementStatus::Pending)
        .collect();
    pending_lines.sort_by(|a, b| {
        a.transaction_date
            .cmp(&b.transaction_date)
            .then_with(|| a.id.cmp(&b.id))
    });
    pending_lines.truncate(limits.statement_lines);

    let eligible_transactions: Vec<&ExpectedTransaction> = transactions
        .iter()
        .filter(|txn| txn.reconciliation_status.is_matchable())
        .take(limits.transactions)
        .collect();

    pending_lines
        .into_iter()
        .map(|line| {
            let wanted_kind = line.compatible_kind();
            let candidates = eligible_transactions
                .iter()
                .filter(|txn| txn.kind == wanted_kind)
                .filter_map(|txn| {
                    match evaluate(
                        &line.amount,
                        line.transaction_date,
                        &txn.expected_amount,
                        txn.settlement_date(),
                        cfg,
                    ) {
                        Verdict::Compatible {
                            amount_difference,
                            date_difference_days,
                            confidence_score,
                        } => Some(ScoredCandidate {
                            statement_line_id: line.id.clone(),
                            transaction_id: txn.id.clone(),
                            transaction_kind: txn.kind,
                            amount_difference,
                            date_difference_days,
                            confidence_score,
                        }),
                        Verdict::Incompatible => None,
                    }
                })
                .collect();

            LineCandidates {
                statement_line_id: line.id.clone(),
                candidates,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn line(id: &str, amount: &str, day: u32, status: StatementStatus) -> StatementLine {
        StatementLine {
            id: id.to_string(),
            account_id: "acc1".to_string(),
            transaction_date: date(day),
            amount: dec(amount),
            description: format!("movement {id}"),
            reconciliation_status: status,
        }
    }

    fn txn(
        id: &str,
        amount: &str,
        day: u32,
        kind: TransactionKind,
        status: TransactionStatus,
    ) -> ExpectedTransaction {
        ExpectedTransaction {
            id: id.to_string(),
            unit_id: "unit1".to_string(),
            account_id: Some("acc1".to_string()),
            expected_amount: dec(amount),
            expected_date: Some(date(day)),
            nominal_date: date(day),
            actual_settlement_date: None,
            reconciliation_status: status,
            kind,
            counterparty_name: None,
        }
    }

    #[test]
    fn credit_lines_only_see_receivables() {
        let lines = vec![line("stmt1", "150.00", 15, StatementStatus::Pending)];
        let txns = vec![
            txn(
                "pay1",
                "150.00",
                15,
                TransactionKind::Payable,
                TransactionStatus::Pending,
            ),
            txn(
                "rec1",
                "150.00",
                15,
                TransactionKind::Receivable,
                TransactionStatus::Pending,
            ),
        ];

        let out = generate_candidates(
            &lines,
            &txns,
            &ToleranceConfig::new(dec("0.01"), 0),
            &MatchLimits::default(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].candidates.len(), 1);
        assert_eq!(out[0].candidates[0].transaction_id, "rec1");
    }

    #[test]
    fn debit_lines_only_see_payables() {
        let lines = vec![line("stmt1", "-80.00", 10, StatementStatus::Pending)];
        let txns = vec![
            txn(
                "rec1",
                "80.00",
                10,
                TransactionKind::Receivable,
                TransactionStatus::Pending,
            ),
            txn(
                "pay1",
                "80.00",
                10,
                TransactionKind::Payable,
                TransactionStatus::Scheduled,
            ),
        ];

        let out = generate_candidates(
            &lines,
            &txns,
            &ToleranceConfig::new(dec("0.01"), 0),
            &MatchLimits::default(),
        );
        assert_eq!(out[0].candidates.len(), 1);
        assert_eq!(out[0].candidates[0].transaction_id, "pay1");
    }

    #[test]
    fn reconciled_entries_are_excluded() {
        let lines = vec![
            line("done", "150.00", 15, StatementStatus::Reconciled),
            line("open", "150.00", 15, StatementStatus::Pending),
        ];
        let txns = vec![
            txn(
                "settled",
                "150.00",
                15,
                TransactionKind::Receivable,
                TransactionStatus::Reconciled,
            ),
            txn(
                "due",
                "150.00",
                15,
                TransactionKind::Receivable,
                TransactionStatus::Pending,
            ),
        ];

        let out = generate_candidates(
            &lines,
            &txns,
            &ToleranceConfig::new(dec("0.01"), 0),
            &MatchLimits::default(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].statement_line_id, "open");
        assert_eq!(out[0].candidates.len(), 1);
        assert_eq!(out[0].candidates[0].transaction_id, "due");
    }

    #[test]
    fn lines_are_processed_by_date_then_id() {
        let lines = vec![
            line("b", "10.00", 20, StatementStatus::Pending),
            line("c", "10.00", 10, StatementStatus::Pending),
            line("a", "10.00", 20, StatementStatus::Pending),
        ];

        let out = generate_candidates(
            &lines,
            &[],
            &ToleranceConfig::default(),
            &MatchLimits::default(),
        );
        let order: Vec<&str> = out.iter().map(|c| c.statement_line_id.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn limits_cap_the_working_set() {
        let lines: Vec<StatementLine> = (0..5)
            .map(|i| line(&format!("stmt{i}"), "10.00", 10 + i, StatementStatus::Pending))
            .collect();
        let txns: Vec<ExpectedTransaction> = (0..5)
            .map(|i| {
                txn(
                    &format!("txn{i}"),
                    "10.00",
                    10,
                    TransactionKind::Receivable,
                    TransactionStatus::Pending,
                )
            })
            .collect();

        let limits = MatchLimits {
            statement_lines: 2,
            transactions: 3,
        };
        let out = generate_candidates(&lines, &txns, &ToleranceConfig::new(dec("1.00"), 30), &limits);
        assert_eq!(out.len(), 2);
        for entry in &out {
            assert_eq!(entry.candidates.len(), 3);
        }
    }

    #[test]
    fn incompatible_pairs_leave_an_empty_candidate_list() {
        let lines = vec![line("stmt1", "150.00", 15, StatementStatus::Pending)];
        let txns = vec![txn(
            "far",
            "500.00",
            15,
            TransactionKind::Receivable,
            TransactionStatus::Pending,
        )];

        let out = generate_candidates(
            &lines,
            &txns,
            &ToleranceConfig::new(dec("1.00"), 3),
            &MatchLimits::default(),
        );
        assert_eq!(out.len(), 1);
        assert!(out[0].candidates.is_empty());
    }
}
