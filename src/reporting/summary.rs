//! Global totals, per-type breakdown and paired receipt/fee metrics

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classification::Taxonomy;
use crate::reconciliation::pairing::PairingResult;
use crate::types::*;

/// Total for one operation type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeTotal {
    pub operation_type: String,
    pub classification: Classification,
    pub count: usize,
    /// Sum of amounts with their natural sign
    pub total: BigDecimal,
}

impl TypeTotal {
    /// Amount as reported: absolute for expense types, signed otherwise
    pub fn reported_amount(&self) -> BigDecimal {
        match self.classification {
            Classification::Expense => self.total.abs(),
            Classification::Income | Classification::Unclassified => self.total.clone(),
        }
    }
}

/// Metrics over the paired receipts and fees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedTotals {
    pub receipt_count: usize,
    pub fee_count: usize,
    pub receipt_total: BigDecimal,
    /// Sum of absolute fee amounts
    pub fee_total: BigDecimal,
    /// `receipt_total - fee_total`
    pub balance: BigDecimal,
    pub average_fee: BigDecimal,
    /// Fees as a percentage of paired receipts
    pub fee_percentage: BigDecimal,
}

/// Summary statistics for a transaction list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub transaction_count: usize,
    pub income_count: usize,
    pub expense_count: usize,
    pub unclassified_count: usize,
    /// Sum of income amounts (natural sign)
    pub total_income: BigDecimal,
    /// Sum of absolute expense amounts
    pub total_expense: BigDecimal,
    /// `total_income - total_expense`
    pub balance: BigDecimal,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Calendar days covered, both ends included; zero for an empty list
    pub period_days: u64,
    pub average_per_day: BigDecimal,
    /// Per-type totals in order of first appearance
    pub by_type: Vec<TypeTotal>,
    pub paired: PairedTotals,
}

/// Compute paired receipt/fee metrics
pub fn paired_totals(pairing: &PairingResult<'_>) -> PairedTotals {
    let receipt_total = pairing.paired_receipt_total();
    let fee_total = pairing.paired_fee_total();
    let fee_count = pairing.paired_fees.len();

    let average_fee = round_currency(&safe_div(&fee_total, &BigDecimal::from(fee_count as u64)));
    let fee_percentage = if receipt_total > BigDecimal::from(0) {
        round_currency(&(&fee_total * BigDecimal::from(100) / &receipt_total))
    } else {
        BigDecimal::from(0)
    };

    PairedTotals {
        receipt_count: pairing.paired_receipts.len(),
        fee_count,
        balance: &receipt_total - &fee_total,
        receipt_total,
        fee_total,
        average_fee,
        fee_percentage,
    }
}

/// Per-type totals in order of first appearance
pub fn type_totals(transactions: &[Transaction], taxonomy: &Taxonomy) -> Vec<TypeTotal> {
    let mut totals: Vec<TypeTotal> = Vec::new();

    for tx in transactions {
        match totals
            .iter_mut()
            .find(|t| t.operation_type == tx.operation_type)
        {
            Some(total) => {
                total.count += 1;
                total.total += &tx.amount;
            }
            None => totals.push(TypeTotal {
                operation_type: tx.operation_type.clone(),
                classification: taxonomy.classify_transaction(tx),
                count: 1,
                total: tx.amount.clone(),
            }),
        }
    }

    totals
}

/// Compute summary statistics
pub fn summarize(
    transactions: &[Transaction],
    taxonomy: &Taxonomy,
    pairing: &PairingResult<'_>,
) -> SummaryStats {
    let mut income_count = 0;
    let mut expense_count = 0;
    let mut unclassified_count = 0;
    let mut total_income = BigDecimal::from(0);
    let mut total_expense = BigDecimal::from(0);

    for tx in transactions {
        match taxonomy.classify_transaction(tx) {
            Classification::Income => {
                income_count += 1;
                total_income += &tx.amount;
            }
            Classification::Expense => {
                expense_count += 1;
                total_expense += tx.abs_amount();
            }
            Classification::Unclassified => unclassified_count += 1,
        }
    }

    let first_date = transactions.iter().map(Transaction::date).min();
    let last_date = transactions.iter().map(Transaction::date).max();
    let period_days = match (first_date, last_date) {
        (Some(first), Some(last)) => (last - first).num_days().unsigned_abs() + 1,
        _ => 0,
    };

    let average_per_day = round_currency(&safe_div(
        &BigDecimal::from(transactions.len() as u64),
        &BigDecimal::from(period_days),
    ));

    if unclassified_count > 0 {
        tracing::debug!(
            unclassified = unclassified_count,
            "transactions with labels outside the taxonomy"
        );
    }

    SummaryStats {
        transaction_count: transactions.len(),
        income_count,
        expense_count,
        unclassified_count,
        balance: &total_income - &total_expense,
        total_income,
        total_expense,
        first_date,
        last_date,
        period_days,
        average_per_day,
        by_type: type_totals(transactions, taxonomy),
        paired: paired_totals(pairing),
    }
}
