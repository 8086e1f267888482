//! Tolerance evaluation and confidence scoring for candidate pairs

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{ReconResult, ReconciliationError};

/// Upper bound for the absolute amount tolerance, in currency units
pub const MAX_AMOUNT_TOLERANCE: i64 = 100;

/// Maximum points deducted for an amount difference
const AMOUNT_PENALTY_WEIGHT: f64 = 15.0;
/// Maximum points deducted for a date difference
const DATE_PENALTY_WEIGHT: f64 = 30.0;
/// A compatible pair never scores below this
const SCORE_FLOOR: f64 = 50.0;

/// Tolerances within which a statement line and a transaction are
/// considered a candidate pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceConfig {
    /// Maximum absolute amount difference, in currency units (not a
    /// percentage); must be in `(0, 100]`
    pub amount_tolerance: BigDecimal,
    /// Maximum absolute day difference between the statement date and
    /// the transaction's settlement date
    pub date_tolerance_days: u32,
}

impl ToleranceConfig {
    pub fn new(amount_tolerance: BigDecimal, date_tolerance_days: u32) -> Self {
        Self {
            amount_tolerance,
            date_tolerance_days,
        }
    }

    /// Validate the configured tolerances
    ///
    /// An out-of-range amount tolerance is a configuration error and must
    /// fail before any matching begins, not reject pairs one by one.
    pub fn validate(&self) -> ReconResult<()> {
        if self.amount_tolerance <= BigDecimal::from(0) {
            return Err(ReconciliationError::Validation(
                "Amount tolerance must be greater than zero".to_string(),
            ));
        }

        if self.amount_tolerance > BigDecimal::from(MAX_AMOUNT_TOLERANCE) {
            return Err(ReconciliationError::Validation(format!(
                "Amount tolerance cannot exceed {} currency units",
                MAX_AMOUNT_TOLERANCE
            )));
        }

        Ok(())
    }
}

impl Default for ToleranceConfig {
    /// One cent of amount slack and a three-day settlement window
    fn default() -> Self {
        Self {
            amount_tolerance: BigDecimal::new(1.into(), 2),
            date_tolerance_days: 3,
        }
    }
}

/// Outcome of evaluating one statement/transaction pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    /// The pair exceeds at least one tolerance; no score is computed
    Incompatible,
    /// The pair is within both tolerances
    Compatible {
        /// Absolute difference between the unsigned amounts
        amount_difference: BigDecimal,
        /// Absolute day difference between the dates
        date_difference_days: i64,
        /// 0-100, 100 = exact match
        confidence_score: u8,
    },
}

impl Verdict {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Verdict::Compatible { .. })
    }
}

/// Evaluate one statement amount/date against one transaction
/// amount/date under the given tolerances
///
/// Amounts are compared by absolute value so that a debit line (negative
/// signed amount) can pair with a payable recorded as a positive expected
/// amount. Pure function; callers must have validated `cfg` beforehand.
pub fn evaluate(
    stmt_amount: &BigDecimal,
    stmt_date: NaiveDate,
    txn_amount: &BigDecimal,
    txn_date: NaiveDate,
    cfg: &ToleranceConfig,
) -> Verdict {
    let amount_difference = (stmt_amount.abs() - txn_amount.abs()).abs();
    if amount_difference > cfg.amount_tolerance {
        return Verdict::Incompatible;
    }

    let date_difference_days = (stmt_date - txn_date).num_days().abs();
    if date_difference_days > i64::from(cfg.date_tolerance_days) {
        return Verdict::Incompatible;
    }

    let confidence_score = confidence_score(&amount_difference, date_difference_days, cfg);

    Verdict::Compatible {
        amount_difference,
        date_difference_days,
        confidence_score,
    }
}

/// Score a compatible pair: start at 100, deduct proportional penalties
/// for the amount and date differences, floor at 50
fn confidence_score(
    amount_difference: &BigDecimal,
    date_difference_days: i64,
    cfg: &ToleranceConfig,
) -> u8 {
    let mut score = 100.0;

    if cfg.amount_tolerance > BigDecimal::from(0) {
        let ratio = (amount_difference / &cfg.amount_tolerance)
            .to_f64()
            .unwrap_or(1.0);
        score -= (ratio * AMOUNT_PENALTY_WEIGHT).min(AMOUNT_PENALTY_WEIGHT);
    }

    if cfg.date_tolerance_days > 0 {
        let ratio = date_difference_days as f64 / f64::from(cfg.date_tolerance_days);
        score -= (ratio * DATE_PENALTY_WEIGHT).min(DATE_PENALTY_WEIGHT);
    }

    score.round().max(SCORE_FLOOR) as u8
}
