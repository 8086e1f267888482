//! Auto-reconciliation usage example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

use reconciliation_core::utils::MemoryStorage;
use reconciliation_core::{
    AutoReconcileParams, ExpectedTransaction, ReconciliationEngine, StatementLine,
    StatementStatus, ToleranceConfig, TransactionKind, TransactionStatus,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏦 Reconciliation Core - Auto-Reconcile Example\n");

    // Seed an in-memory store with a small bank statement and the
    // receivables/payables the business expects
    let store = MemoryStorage::new();

    println!("📄 Importing statement lines...");
    for (id, amount, day, description) in [
        ("stmt-001", "180.00", 10, "PIX RECEIVED - J SILVA"),
        ("stmt-002", "249.90", 11, "CARD SETTLEMENT"),
        ("stmt-003", "-75.50", 12, "SUPPLIER DEBIT"),
        ("stmt-004", "42.00", 14, "PIX RECEIVED - UNKNOWN"),
    ] {
        store.insert_statement_line(StatementLine {
            id: id.to_string(),
            account_id: "acc-main".to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            amount: BigDecimal::from_str(amount)?,
            description: description.to_string(),
            reconciliation_status: StatementStatus::Pending,
        });
        println!("  ✓ {id}: {amount} on 2025-01-{day:02}");
    }

    println!("\n💼 Recording expected transactions...");
    for (id, amount, day, kind, counterparty) in [
        ("rcv-101", "180.00", 10, TransactionKind::Receivable, "João Silva"),
        ("rcv-102", "250.00", 12, TransactionKind::Receivable, "Card acquirer"),
        ("pay-201", "75.50", 12, TransactionKind::Payable, "Beauty supplies Ltda"),
    ] {
        store.insert_transaction(ExpectedTransaction {
            id: id.to_string(),
            unit_id: "unit-downtown".to_string(),
            account_id: Some("acc-main".to_string()),
            expected_amount: BigDecimal::from_str(amount)?,
            expected_date: Some(NaiveDate::from_ymd_opt(2025, 1, day).unwrap()),
            nominal_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            actual_settlement_date: None,
            reconciliation_status: TransactionStatus::Pending,
            kind,
            counterparty_name: Some(counterparty.to_string()),
        });
        println!("  ✓ {id}: {amount} expected 2025-01-{day:02} ({counterparty})");
    }

    // Run the matcher with 0.50 of amount slack and a 3-day window
    let mut engine = ReconciliationEngine::new(store.clone(), store.clone());
    let params = AutoReconcileParams::new(
        "acc-main".to_string(),
        "unit-downtown".to_string(),
        ToleranceConfig::new(BigDecimal::from_str("0.50")?, 3),
    );

    println!("\n🔍 Running auto-reconcile...");
    let outcome = engine.auto_reconcile(&params).await?;

    println!(
        "  Scanned {} statement lines and {} transactions, {} already reconciled",
        outcome.summary.total_statements,
        outcome.summary.total_transactions,
        outcome.summary.already_reconciled
    );
    println!("  Proposed {} matches:\n", outcome.summary.matches_found);

    for proposal in &outcome.matches {
        println!(
            "  {} ↔ {} (score {}, Δ amount {}, Δ days {}){}",
            proposal.statement_line_id,
            proposal.transaction_id,
            proposal.confidence_score,
            proposal.amount_difference,
            proposal.date_difference_days,
            if proposal.is_divergent() {
                "  ⚠ divergent"
            } else {
                ""
            }
        );
    }

    // A human reviews the proposals; here we confirm them all
    println!("\n✅ Confirming proposals...");
    for proposal in &outcome.matches {
        let confirmed = engine.confirm_reconciliation(&proposal.id).await?;
        println!(
            "  ✓ {} confirmed at {}",
            confirmed.id,
            confirmed.confirmed_at.expect("just confirmed")
        );
    }

    // stmt-004 had no compatible counterpart and stays pending
    let leftover = store.statement_line("stmt-004").expect("seeded above");
    println!(
        "\n📌 {} remains {:?} for manual review",
        leftover.id, leftover.reconciliation_status
    );

    Ok(())
}
