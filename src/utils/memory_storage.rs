//! In-memory storage implementation for testing

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
///
/// Implements both repositories over shared maps. Enforces the
/// confirm-uniqueness invariant the way a database would with unique
/// partial indexes: at most one confirmed match per statement line and
/// per transaction.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    statement_lines: Arc<RwLock<HashMap<String, StatementLine>>>,
    transactions: Arc<RwLock<HashMap<String, ExpectedTransaction>>>,
    matches: Arc<RwLock<HashMap<String, ReconciliationMatch>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            statement_lines: Arc::new(RwLock::new(HashMap::new())),
            transactions: Arc::new(RwLock::new(HashMap::new())),
            matches: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.statement_lines.write().unwrap().clear();
        self.transactions.write().unwrap().clear();
        self.matches.write().unwrap().clear();
    }

    /// Seed a statement line
    pub fn insert_statement_line(&self, line: StatementLine) {
        self.statement_lines
            .write()
            .unwrap()
            .insert(line.id.clone(), line);
    }

    /// Seed an expected transaction
    pub fn insert_transaction(&self, txn: ExpectedTransaction) {
        self.transactions.write().unwrap().insert(txn.id.clone(), txn);
    }

    /// Direct read of a statement line, bypassing the repository trait
    pub fn statement_line(&self, id: &str) -> Option<StatementLine> {
        self.statement_lines.read().unwrap().get(id).cloned()
    }

    /// Direct read of a transaction, bypassing the repository trait
    pub fn transaction(&self, id: &str) -> Option<ExpectedTransaction> {
        self.transactions.read().unwrap().get(id).cloned()
    }

    /// Direct read of a match record, bypassing the repository trait
    pub fn match_record(&self, id: &str) -> Option<ReconciliationMatch> {
        self.matches.read().unwrap().get(id).cloned()
    }

    /// Number of confirmed matches currently stored
    pub fn confirmed_count(&self) -> usize {
        self.matches
            .read()
            .unwrap()
            .values()
            .filter(|m| m.status == MatchStatus::Confirmed)
            .count()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatementRepository for MemoryStorage {
    async fn list_statement_lines(
        &self,
        account_id: &str,
        limit: usize,
    ) -> ReconResult<Vec<StatementLine>> {
        let lines = self.statement_lines.read().unwrap();
        let mut filtered: Vec<StatementLine> = lines
            .values()
            .filter(|line| line.account_id == account_id)
            .cloned()
            .collect();
        // Stable order so repeated runs see the same working set
        filtered.sort_by(|a, b| {
            a.transaction_date
                .cmp(&b.transaction_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        filtered.truncate(limit);
        Ok(filtered)
    }

    async fn get_statement_line(&self, id: &str) -> ReconResult<Option<StatementLine>> {
        Ok(self.statement_lines.read().unwrap().get(id).cloned())
    }

    async fn list_eligible_transactions(
        &self,
        unit_id: &str,
        limit: usize,
    ) -> ReconResult<Vec<ExpectedTransaction>> {
        let transactions = self.transactions.read().unwrap();
        let mut filtered: Vec<ExpectedTransaction> = transactions
            .values()
            .filter(|txn| txn.unit_id == unit_id && txn.reconciliation_status.is_matchable())
            .cloned()
            .collect();
        filtered.sort_by(|a, b| {
            a.settlement_date()
                .cmp(&b.settlement_date())
                .then_with(|| a.id.cmp(&b.id))
        });
        filtered.truncate(limit);
        Ok(filtered)
    }

    async fn get_transaction(&self, id: &str) -> ReconResult<Option<ExpectedTransaction>> {
        Ok(self.transactions.read().unwrap().get(id).cloned())
    }

    async fn update_statement_status(
        &mut self,
        id: &str,
        status: StatementStatus,
    ) -> ReconResult<()> {
        match self.statement_lines.write().unwrap().get_mut(id) {
            Some(line) => {
                line.reconciliation_status = status;
                Ok(())
            }
            None => Err(ReconciliationError::NotFound(format!(
                "statement line '{id}'"
            ))),
        }
    }

    async fn update_transaction_status(
        &mut self,
        id: &str,
        status: TransactionStatus,
    ) -> ReconResult<()> {
        match self.transactions.write().unwrap().get_mut(id) {
            Some(txn) => {
                txn.reconciliation_status = status;
                Ok(())
            }
            None => Err(ReconciliationError::NotFound(format!("transaction '{id}'"))),
        }
    }
}

#[async_trait]
impl ReconciliationRepository for MemoryStorage {
    async fn create_match(&mut self, m: &ReconciliationMatch) -> ReconResult<ReconciliationMatch> {
        self.matches
            .write()
            .unwrap()
            .insert(m.id.clone(), m.clone());
        Ok(m.clone())
    }

    async fn get_match(&self, id: &str) -> ReconResult<Option<ReconciliationMatch>> {
        Ok(self.matches.read().unwrap().get(id).cloned())
    }

    async fn update_match_status(
        &mut self,
        id: &str,
        status: MatchStatus,
        confirmed_at: Option<NaiveDateTime>,
        notes: Option<String>,
    ) -> ReconResult<()> {
        let mut matches = self.matches.write().unwrap();

        if status == MatchStatus::Confirmed {
            let target = matches
                .get(id)
                .ok_or_else(|| ReconciliationError::NotFound(format!("match '{id}'")))?;
            let conflict = matches.values().any(|other| {
                other.id != id
                    && other.status == MatchStatus::Confirmed
                    && (other.statement_line_id == target.statement_line_id
                        || other.transaction_id == target.transaction_id)
            });
            if conflict {
                return Err(ReconciliationError::AlreadyConfirmed(format!(
                    "statement line '{}' or transaction '{}' already has a confirmed match",
                    target.statement_line_id, target.transaction_id
                )));
            }
        }

        match matches.get_mut(id) {
            Some(record) => {
                record.status = status;
                if confirmed_at.is_some() {
                    record.confirmed_at = confirmed_at;
                }
                if notes.is_some() {
                    record.notes = notes;
                }
                Ok(())
            }
            None => Err(ReconciliationError::NotFound(format!("match '{id}'"))),
        }
    }

    async fn delete_match(&mut self, id: &str) -> ReconResult<()> {
        if self.matches.write().unwrap().remove(id).is_some() {
            Ok(())
        } else {
            Err(ReconciliationError::NotFound(format!("match '{id}'")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;

    fn line(id: &str, account: &str, day: u32) -> StatementLine {
        StatementLine {
            id: id.to_string(),
            account_id: account.to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            amount: BigDecimal::from_str("10.00").unwrap(),
            description: "test".to_string(),
            reconciliation_status: StatementStatus::Pending,
        }
    }

    fn match_for(id: &str, stmt: &str, txn: &str, status: MatchStatus) -> ReconciliationMatch {
        ReconciliationMatch {
            id: id.to_string(),
            statement_line_id: stmt.to_string(),
            transaction_id: txn.to_string(),
            transaction_kind: TransactionKind::Receivable,
            amount_difference: BigDecimal::from(0),
            date_difference_days: 0,
            confidence_score: 100,
            status,
            created_at: Utc::now().naive_utc(),
            confirmed_at: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn listing_filters_by_account_and_sorts() {
        let store = MemoryStorage::new();
        store.insert_statement_line(line("b", "acc1", 20));
        store.insert_statement_line(line("a", "acc1", 10));
        store.insert_statement_line(line("c", "acc2", 5));

        let lines = store.list_statement_lines("acc1", 100).await.unwrap();
        let ids: Vec<&str> = lines.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let capped = store.list_statement_lines("acc1", 1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn confirm_uniqueness_is_enforced_per_statement_line() {
        let mut store = MemoryStorage::new();
        store
            .create_match(&match_for("m1", "stmt1", "txn1", MatchStatus::Confirmed))
            .await
            .unwrap();
        store
            .create_match(&match_for("m2", "stmt1", "txn2", MatchStatus::Pending))
            .await
            .unwrap();

        let result = store
            .update_match_status("m2", MatchStatus::Confirmed, Some(Utc::now().naive_utc()), None)
            .await;
        assert!(matches!(
            result,
            Err(ReconciliationError::AlreadyConfirmed(_))
        ));
        assert_eq!(store.confirmed_count(), 1);
    }

    #[tokio::test]
    async fn confirm_uniqueness_is_enforced_per_transaction() {
        let mut store = MemoryStorage::new();
        store
            .create_match(&match_for("m1", "stmt1", "txn1", MatchStatus::Confirmed))
            .await
            .unwrap();
        store
            .create_match(&match_for("m2", "stmt2", "txn1", MatchStatus::Pending))
            .await
            .unwrap();

        let result = store
            .update_match_status("m2", MatchStatus::Confirmed, Some(Utc::now().naive_utc()), None)
            .await;
        assert!(matches!(
            result,
            Err(ReconciliationError::AlreadyConfirmed(_))
        ));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let mut store = MemoryStorage::new();
        assert!(matches!(
            store
                .update_statement_status("missing", StatementStatus::Reconciled)
                .await,
            Err(ReconciliationError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_match("missing").await,
            Err(ReconciliationError::NotFound(_))
        ));
    }
}
