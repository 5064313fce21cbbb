//! Reconcile a movement export and print the results
//!
//! ```bash
//! cargo run --example reconcile_statement -- movements.csv [config.json]
//! ```
//!
//! Without arguments a small built-in statement is used.

use reconcile_core::utils::{load_transactions_csv, read_transactions_csv};
use reconcile_core::{ReconciliationConfig, ReconciliationEngine, Transaction};
use chrono::Weekday;

const SAMPLE: &str = "\
date,type,id,related_key,amount,description
2024-01-01 09:12:00,Recebimento,1001,OP-1,100.00,Pedido 1
2024-01-01 09:12:00,Tarifa do Mercado Pago,1002,OP-1,-4.99,
2024-01-01 18:40:00,Transferência via Pix,1003,,-95.01,
2024-01-02 10:05:00,Recebimento,1004,OP-2,35.00,Pedido 2
2024-01-02 10:05:00,Tarifa do Mercado Pago,1005,OP-2,-1.75,
2024-01-02 11:00:00,Recebimento,1006,OP-3,20.00,Pedido 3
2024-01-03 08:00:00,Rendimento bruto,1007,,0.42,
2024-01-03 12:30:00,Pagamento,1008,,-12.90,Assinatura
";

// Weekday names are a presentation concern; the library only hands out chrono::Weekday.
fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Segunda-feira",
        Weekday::Tue => "Terça-feira",
        Weekday::Wed => "Quarta-feira",
        Weekday::Thu => "Quinta-feira",
        Weekday::Fri => "Sexta-feira",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let transactions: Vec<Transaction> = match args.first() {
        Some(path) => load_transactions_csv(path)?,
        None => read_transactions_csv(SAMPLE.as_bytes())?,
    };
    let config = match args.get(1) {
        Some(path) => ReconciliationConfig::from_path(path)?,
        None => ReconciliationConfig::default(),
    };

    let engine = ReconciliationEngine::new(config);
    let report = engine.run(&transactions);
    let summary = &report.summary;

    println!("📊 Summary");
    println!("  Period: {} days", summary.period_days);
    println!("  Transactions: {}", summary.transaction_count);
    println!("  Average per day: {}", summary.average_per_day);
    println!("  Income: {}", summary.total_income);
    println!("  Expenses: {}", summary.total_expense);
    println!("  Balance: {}", summary.balance);
    println!();

    println!("🔗 Paired receipts and fees");
    println!("  Receipts: {} ({})", summary.paired.receipt_count, summary.paired.receipt_total);
    println!("  Fees: {} ({})", summary.paired.fee_count, summary.paired.fee_total);
    println!("  Balance: {}", summary.paired.balance);
    println!("  Average fee: {}", summary.paired.average_fee);
    println!("  Fees over receipts: {}%", summary.paired.fee_percentage);
    for receipt in &report.pairing.unpaired_receipts {
        println!("  ⚠ Receipt {} has no fee for key {:?}", receipt.id, receipt.related_key);
    }
    for fee in &report.pairing.unpaired_fees {
        println!("  ⚠ Fee {} has no receipt for key {:?}", fee.id, fee.related_key);
    }
    println!();

    println!("💸 Settlement candidates (tolerance {})", engine.config().tolerance);
    for m in &report.settlements.matches {
        let ids: Vec<&str> = m.candidates.iter().map(|t| t.id.as_str()).collect();
        println!("  ✓ Receipt {} net {} -> {}", m.receipt.id, m.net, ids.join(", "));
    }
    for m in &report.settlements.unmatched {
        println!("  ✗ Receipt {} net {} has no same-day transfer", m.receipt.id, m.net);
    }
    for (transfer, count) in report.settlements.shared_transfers() {
        println!("  ⚠ Transfer {} fits {} receipts", transfer.id, count);
    }
    println!();

    println!("📅 By weekday");
    for day in report.weekdays.active() {
        println!(
            "  {}: receipts {} fees {} net {}",
            weekday_name(day.weekday),
            day.receipts,
            day.fees,
            day.net
        );
    }
    println!();

    println!("🧾 By operation type");
    for total in &summary.by_type {
        println!("  {}: {}", total.operation_type, total.reported_amount());
    }
    println!();

    println!("💰 Inflows above {}", report.large_entries.threshold);
    for entry in &report.large_entries.entries {
        match (&entry.related_fee, &entry.net) {
            (Some(fee), Some(net)) => println!(
                "  {} {} (fee {}, net {})",
                entry.transaction.id,
                entry.transaction.amount,
                fee.abs_amount(),
                net
            ),
            _ => println!("  {} {}", entry.transaction.id, entry.transaction.amount),
        }
    }

    Ok(())
}
