//! Relation-key pairing of receipts and fees

use bigdecimal::BigDecimal;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::traits::*;
use crate::types::*;

/// Six-way partition of receipts and fees by relation key
///
/// Every selected receipt lands in exactly one of `paired_receipts`,
/// `unpaired_receipts` or `keyless_receipts` (likewise for fees). Buckets keep
/// the source order of the input list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairingResult<'a> {
    /// Keys present on at least one receipt and at least one fee
    pub complete_keys: BTreeSet<&'a str>,
    pub paired_receipts: Vec<&'a Transaction>,
    pub paired_fees: Vec<&'a Transaction>,
    /// Receipts with a key that no fee carries
    pub unpaired_receipts: Vec<&'a Transaction>,
    /// Fees with a key that no receipt carries
    pub unpaired_fees: Vec<&'a Transaction>,
    pub keyless_receipts: Vec<&'a Transaction>,
    pub keyless_fees: Vec<&'a Transaction>,
}

impl<'a> PairingResult<'a> {
    /// Sum of paired receipt amounts
    pub fn paired_receipt_total(&self) -> BigDecimal {
        self.paired_receipts.iter().map(|tx| &tx.amount).sum()
    }

    /// Sum of the absolute amounts of paired fees
    pub fn paired_fee_total(&self) -> BigDecimal {
        self.paired_fees.iter().map(|tx| tx.abs_amount()).sum()
    }

    /// Paired fees carrying the given key, in source order
    pub fn fees_for_key(&self, key: &str) -> Vec<&'a Transaction> {
        self.paired_fees
            .iter()
            .copied()
            .filter(|fee| fee.key() == Some(key))
            .collect()
    }

    /// Total number of receipts across the three buckets
    pub fn receipt_count(&self) -> usize {
        self.paired_receipts.len() + self.unpaired_receipts.len() + self.keyless_receipts.len()
    }

    /// Total number of fees across the three buckets
    pub fn fee_count(&self) -> usize {
        self.paired_fees.len() + self.unpaired_fees.len() + self.keyless_fees.len()
    }
}

type Bucket<'a> = Vec<&'a Transaction>;

/// Key-split view of one side (receipts or fees)
struct Side<'a> {
    keyed: Bucket<'a>,
    keyless: Bucket<'a>,
}

impl<'a> Side<'a> {
    fn select<F>(transactions: &'a [Transaction], filter: &F) -> Self
    where
        F: TransactionFilter + ?Sized,
    {
        let (keyed, keyless) = transactions
            .iter()
            .filter(|tx| filter.matches(tx))
            .partition(|tx| tx.key().is_some());

        Self { keyed, keyless }
    }

    fn keys(&self) -> BTreeSet<&'a str> {
        self.keyed.iter().copied().filter_map(Transaction::key).collect()
    }

    /// Split into (paired, unpaired, keyless) against the complete key set
    fn split(self, complete: &BTreeSet<&'a str>) -> (Bucket<'a>, Bucket<'a>, Bucket<'a>) {
        let (paired, unpaired) = self
            .keyed
            .into_iter()
            .partition(|tx| tx.key().is_some_and(|k| complete.contains(k)));

        (paired, unpaired, self.keyless)
    }
}

/// Partition receipts and fees by relation key
///
/// A transaction matched by both filters is treated as a receipt only.
pub fn pair<'a, R, F>(
    transactions: &'a [Transaction],
    receipt_filter: &R,
    fee_filter: &F,
) -> PairingResult<'a>
where
    R: TransactionFilter + ?Sized,
    F: TransactionFilter + ?Sized,
{
    let receipts = Side::select(transactions, receipt_filter);
    let fee_only = |tx: &Transaction| fee_filter.matches(tx) && !receipt_filter.matches(tx);
    let fees = Side::select(transactions, &fee_only);

    let receipt_keys = receipts.keys();
    let fee_keys = fees.keys();
    let complete_keys: BTreeSet<&'a str> = receipt_keys.intersection(&fee_keys).copied().collect();

    let (paired_receipts, unpaired_receipts, keyless_receipts) = receipts.split(&complete_keys);
    let (paired_fees, unpaired_fees, keyless_fees) = fees.split(&complete_keys);

    tracing::debug!(
        complete_keys = complete_keys.len(),
        paired_receipts = paired_receipts.len(),
        paired_fees = paired_fees.len(),
        unpaired_receipts = unpaired_receipts.len(),
        unpaired_fees = unpaired_fees.len(),
        keyless_receipts = keyless_receipts.len(),
        keyless_fees = keyless_fees.len(),
        "paired receipts and fees"
    );

    PairingResult {
        complete_keys,
        paired_receipts,
        paired_fees,
        unpaired_receipts,
        unpaired_fees,
        keyless_receipts,
        keyless_fees,
    }
}
