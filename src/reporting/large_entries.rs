//! Inflows above a threshold, with the fee charged on each

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::reconciliation::settlement::{earliest, net_amount};
use crate::traits::*;
use crate::types::*;

/// One inflow above the threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LargeEntry<'a> {
    pub transaction: &'a Transaction,
    /// Fee carrying the same relation key, if any
    pub related_fee: Option<&'a Transaction>,
    /// Amount after the related fee
    pub net: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LargeEntryReport<'a> {
    pub threshold: BigDecimal,
    /// Sorted by amount, largest first
    pub entries: Vec<LargeEntry<'a>>,
    pub total: BigDecimal,
    pub average: BigDecimal,
}

/// List non-fee transactions whose amount is strictly above `threshold`
pub fn large_entries<'a, F>(
    transactions: &'a [Transaction],
    threshold: &BigDecimal,
    fee_filter: &F,
) -> LargeEntryReport<'a>
where
    F: TransactionFilter + ?Sized,
{
    let fees: Vec<&'a Transaction> = transactions
        .iter()
        .filter(|tx| fee_filter.matches(tx))
        .collect();

    let mut entries: Vec<LargeEntry<'a>> = transactions
        .iter()
        .filter(|tx| tx.amount > *threshold && !fee_filter.matches(tx))
        .map(|tx| {
            let related: Vec<&'a Transaction> = match tx.key() {
                Some(key) => fees.iter().copied().filter(|f| f.key() == Some(key)).collect(),
                None => Vec::new(),
            };
            let related_fee = earliest(&related);

            LargeEntry {
                transaction: tx,
                related_fee,
                net: related_fee.map(|fee| net_amount(tx, fee)),
            }
        })
        .collect();

    entries.sort_by(|a, b| b.transaction.amount.cmp(&a.transaction.amount));

    let total: BigDecimal = entries.iter().map(|e| &e.transaction.amount).sum();
    let average = round_currency(&safe_div(&total, &BigDecimal::from(entries.len() as u64)));

    LargeEntryReport {
        threshold: threshold.clone(),
        entries,
        total,
        average,
    }
}
