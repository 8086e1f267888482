//! Assignment resolution: collapse competing candidates into a unique
//! 1:1 pairing

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::matching::candidates::{LineCandidates, ScoredCandidate};

/// Pick at most one transaction per statement line, never reusing a
/// transaction
///
/// Lines are processed in input order (the generator already sorted
/// them); for each line the best not-yet-consumed candidate wins.
/// Consumption is tracked in id sets local to this call, so entities are
/// never mutated and repeated runs over the same input produce the same
/// assignment.
///
/// The result is sorted by confidence score descending (statement line
/// id breaks ties) as a presentation contract.
pub fn resolve(candidates_by_line: &[LineCandidates]) -> Vec<ScoredCandidate> {
    let mut consumed_transactions: HashSet<&str> = HashSet::new();
    let mut consumed_lines: HashSet<&str> = HashSet::new();
    let mut matches: Vec<ScoredCandidate> = Vec::new();

    for entry in candidates_by_line {
        if !consumed_lines.insert(entry.statement_line_id.as_str()) {
            continue;
        }

        let winner = entry
            .candidates
            .iter()
            .filter(|c| !consumed_transactions.contains(c.transaction_id.as_str()))
            .min_by(|a, b| preference(a, b));

        if let Some(winner) = winner {
            consumed_transactions.insert(winner.transaction_id.as_str());
            matches.push(winner.clone());
        }
    }

    matches.sort_by(|a, b| {
        b.confidence_score
            .cmp(&a.confidence_score)
            .then_with(|| a.statement_line_id.cmp(&b.statement_line_id))
    });
    matches
}

/// Total preference order over candidates of one statement line: highest
/// confidence first, then smallest amount difference, smallest date
/// difference, and finally lexicographically smallest transaction id so
/// a single deterministic winner always exists
fn preference(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.confidence_score
        .cmp(&a.confidence_score)
        .then_with(|| a.amount_difference.cmp(&b.amount_difference))
        .then_with(|| a.date_difference_days.cmp(&b.date_difference_days))
        .then_with(|| a.transaction_id.cmp(&b.transaction_id))
}
