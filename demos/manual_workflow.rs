//! Manual confirm/reject/link workflow example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

use reconciliation_core::utils::MemoryStorage;
use reconciliation_core::{
    AutoReconcileParams, Envelope, ExpectedTransaction, ManualLinkRequest, ReconciliationEngine,
    StatementLine, StatementStatus, ToleranceConfig, TransactionKind, TransactionStatus,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🗂  Reconciliation Core - Manual Workflow Example\n");

    let store = MemoryStorage::new();
    store.insert_statement_line(StatementLine {
        id: "stmt-101".to_string(),
        account_id: "acc-main".to_string(),
        transaction_date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
        amount: BigDecimal::from_str("198.00")?,
        description: "TED RECEIVED".to_string(),
        reconciliation_status: StatementStatus::Pending,
    });
    store.insert_transaction(ExpectedTransaction {
        id: "rcv-301".to_string(),
        unit_id: "unit-downtown".to_string(),
        account_id: Some("acc-main".to_string()),
        expected_amount: BigDecimal::from_str("200.00")?,
        expected_date: Some(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()),
        nominal_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        actual_settlement_date: None,
        reconciliation_status: TransactionStatus::Pending,
        kind: TransactionKind::Receivable,
        counterparty_name: Some("Maria Santos".to_string()),
    });

    let mut engine = ReconciliationEngine::new(store.clone(), store.clone());

    // A tight tolerance finds nothing: the bank moved 2.00 less than
    // expected
    let params = AutoReconcileParams::new(
        "acc-main".to_string(),
        "unit-downtown".to_string(),
        ToleranceConfig::new(BigDecimal::from_str("0.05")?, 3),
    );
    let outcome = engine.auto_reconcile(&params).await?;
    println!(
        "🔍 Auto-reconcile proposed {} matches (expected: 0)\n",
        outcome.summary.matches_found
    );

    // The operator recognizes the 2.00 gap as a transfer fee and links
    // the pair by hand; manual links confirm immediately
    println!("🖇  Linking stmt-101 to rcv-301 with a 2.00 fee adjustment...");
    let linked = engine
        .manual_link(ManualLinkRequest {
            statement_line_id: "stmt-101".to_string(),
            transaction_kind: TransactionKind::Receivable,
            transaction_id: "rcv-301".to_string(),
            adjustment_amount: BigDecimal::from_str("-2.00")?,
            notes: Some("TED fee absorbed by client".to_string()),
        })
        .await?;
    println!(
        "  ✓ Match {} is {:?} (Δ amount after adjustment: {})\n",
        linked.id, linked.status, linked.amount_difference
    );

    // Trying to confirm it again is a conflict, shown here through the
    // uniform envelope a host API would return
    let envelope: Envelope<_> = engine.confirm_reconciliation(&linked.id).await.into();
    println!(
        "🔁 Second confirm: success={} error={:?}",
        envelope.success, envelope.error
    );

    Ok(())
}
