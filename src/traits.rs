//! Traits for selecting transactions and plugging in custom rules

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::*;

/// Predicate deciding whether a transaction belongs to a group
/// (receipts, fees, outbound transfers, ...)
///
/// Implemented for [`LabelSet`] and for any `Fn(&Transaction) -> bool`, so the
/// pairing and matching steps can be driven by configuration or by ad-hoc
/// closures in tests.
pub trait TransactionFilter {
    /// Returns true if the transaction is selected
    fn matches(&self, transaction: &Transaction) -> bool;
}

impl<F> TransactionFilter for F
where
    F: Fn(&Transaction) -> bool,
{
    fn matches(&self, transaction: &Transaction) -> bool {
        self(transaction)
    }
}

/// Set of operation-type labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(BTreeSet<String>);

impl LabelSet {
    /// Check whether a label is part of the set
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    /// Iterate over the labels in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels present in both sets
    pub fn intersection<'a>(&'a self, other: &'a LabelSet) -> impl Iterator<Item = &'a str> {
        self.0.intersection(&other.0).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl TransactionFilter for LabelSet {
    fn matches(&self, transaction: &Transaction) -> bool {
        self.contains(&transaction.operation_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn transaction(operation_type: &str) -> Transaction {
        Transaction::new(
            "m1".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            operation_type.to_string(),
            BigDecimal::from(1),
        )
    }

    #[test]
    fn test_label_set_filter() {
        let labels: LabelSet = ["Pagamento", "Transferência via Pix"].into_iter().collect();

        assert!(labels.matches(&transaction("Pagamento")));
        assert!(!labels.matches(&transaction("Recebimento")));
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_label_set_iterates_sorted() {
        let labels: LabelSet = ["Saque", "Pagamento", "Saque"].into_iter().collect();

        let collected: Vec<&str> = labels.iter().collect();
        assert_eq!(collected, vec!["Pagamento", "Saque"]);
    }

    #[test]
    fn test_closure_filter() {
        let positive = |tx: &Transaction| tx.amount > BigDecimal::from(0);
        assert!(positive.matches(&transaction("anything")));
    }
}
