//! Same-day net settlement matching of paired receipts against outbound transfers

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::reconciliation::pairing::PairingResult;
use crate::traits::*;
use crate::types::*;

/// A paired receipt, the fee charged on it and every same-day transfer whose
/// amount fits its net value
///
/// These are candidates, not an assignment: the same transfer may appear
/// under several receipts (see [`SettlementReport::shared_transfers`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateMatch<'a> {
    pub receipt: &'a Transaction,
    pub fee: &'a Transaction,
    /// `receipt.amount - |fee.amount|`, rounded to currency precision
    pub net: BigDecimal,
    pub candidates: Vec<&'a Transaction>,
}

/// More than one paired fee carries the same relation key
///
/// The earliest fee (by timestamp, then source order) is used for the net
/// value; the others are listed in `competing`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeAmbiguity<'a> {
    pub key: &'a str,
    pub chosen: &'a Transaction,
    pub competing: Vec<&'a Transaction>,
}

/// Outcome of net settlement matching
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementReport<'a> {
    /// Tolerance the comparison was run with
    pub tolerance: BigDecimal,
    /// Receipts with at least one candidate transfer
    pub matches: Vec<CandidateMatch<'a>>,
    /// Receipts with no candidate transfer
    pub unmatched: Vec<CandidateMatch<'a>>,
    /// Keys shared by several paired fees
    pub ambiguities: Vec<FeeAmbiguity<'a>>,
}

impl<'a> SettlementReport<'a> {
    /// Transfers proposed for more than one receipt, with the number of receipts
    pub fn shared_transfers(&self) -> Vec<(&'a Transaction, usize)> {
        let mut counts: Vec<(&'a Transaction, usize)> = Vec::new();

        for candidate in self.matches.iter().flat_map(|m| m.candidates.iter().copied()) {
            match counts.iter_mut().find(|(t, _)| std::ptr::eq(*t, candidate)) {
                Some((_, count)) => *count += 1,
                None => counts.push((candidate, 1)),
            }
        }

        counts.retain(|(_, count)| *count > 1);
        counts
    }

    /// True when no transfer is proposed for more than one receipt
    pub fn is_exclusive(&self) -> bool {
        self.shared_transfers().is_empty()
    }

    /// Number of (receipt, transfer) candidate pairs
    pub fn candidate_count(&self) -> usize {
        self.matches.iter().map(|m| m.candidates.len()).sum()
    }
}

/// Whether a transfer amount is within `tolerance` of a net value (inclusive)
pub fn within_tolerance(
    transfer_amount: &BigDecimal,
    net: &BigDecimal,
    tolerance: &BigDecimal,
) -> bool {
    (transfer_amount.abs() - net).abs() <= *tolerance
}

/// Net value of a receipt after its fee, at currency precision
pub fn net_amount(receipt: &Transaction, fee: &Transaction) -> BigDecimal {
    round_currency(&(&receipt.amount - fee.abs_amount()))
}

/// Pick the earliest fee; ties keep source order
pub(crate) fn earliest<'a>(fees: &[&'a Transaction]) -> Option<&'a Transaction> {
    fees.iter().copied().min_by_key(|fee| fee.timestamp)
}

/// Select the outbound transfers from a transaction list
pub fn outbound_transfers<'a, F>(
    transactions: &'a [Transaction],
    filter: &F,
) -> Vec<&'a Transaction>
where
    F: TransactionFilter + ?Sized,
{
    transactions.iter().filter(|tx| filter.matches(tx)).collect()
}

/// Match every paired receipt's net value against same-day outbound transfers
pub fn match_settlements<'a, I>(
    pairing: &PairingResult<'a>,
    outbound: I,
    tolerance: &BigDecimal,
) -> SettlementReport<'a>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let zero = BigDecimal::from(0);
    let tolerance = if *tolerance < zero {
        zero
    } else {
        tolerance.clone()
    };

    let mut by_date: BTreeMap<NaiveDate, Vec<&'a Transaction>> = BTreeMap::new();
    for transfer in outbound {
        by_date.entry(transfer.date()).or_default().push(transfer);
    }

    let mut fees_by_key: BTreeMap<&'a str, Vec<&'a Transaction>> = BTreeMap::new();
    for fee in pairing.paired_fees.iter().copied() {
        if let Some(key) = fee.key() {
            fees_by_key.entry(key).or_default().push(fee);
        }
    }

    let mut chosen_fees: BTreeMap<&'a str, &'a Transaction> = BTreeMap::new();
    let mut ambiguities = Vec::new();
    for (&key, fees) in &fees_by_key {
        let Some(chosen) = earliest(fees) else {
            continue;
        };
        chosen_fees.insert(key, chosen);

        if fees.len() > 1 {
            tracing::warn!(
                key,
                fees = fees.len(),
                chosen = %chosen.id,
                "several fees share one relation key, using the earliest"
            );
            ambiguities.push(FeeAmbiguity {
                key,
                chosen,
                competing: fees
                    .iter()
                    .copied()
                    .filter(|fee| !std::ptr::eq(*fee, chosen))
                    .collect(),
            });
        }
    }

    let mut matches = Vec::new();
    let mut unmatched = Vec::new();
    for receipt in pairing.paired_receipts.iter().copied() {
        let Some(fee) = receipt.key().and_then(|key| chosen_fees.get(key).copied()) else {
            continue;
        };

        let net = net_amount(receipt, fee);
        let candidates: Vec<&'a Transaction> = by_date
            .get(&receipt.date())
            .map(|transfers| {
                transfers
                    .iter()
                    .copied()
                    .filter(|transfer| within_tolerance(&transfer.amount, &net, &tolerance))
                    .collect()
            })
            .unwrap_or_default();

        let entry = CandidateMatch {
            receipt,
            fee,
            net,
            candidates,
        };
        if entry.candidates.is_empty() {
            unmatched.push(entry);
        } else {
            matches.push(entry);
        }
    }

    tracing::debug!(
        matched = matches.len(),
        unmatched = unmatched.len(),
        ambiguous_keys = ambiguities.len(),
        "settlement matching finished"
    );

    SettlementReport {
        tolerance,
        matches,
        unmatched,
        ambiguities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::labels;
    use crate::reconciliation::pairing::pair;
    use chrono::NaiveDateTime;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn tx(id: &str, kind: &str, amount: &str, at: &str, key: Option<&str>) -> Transaction {
        let tx = Transaction::new(
            id.to_string(),
            NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M").unwrap(),
            kind.to_string(),
            dec(amount),
        );
        match key {
            Some(key) => tx.with_related_key(key.to_string()),
            None => tx,
        }
    }

    fn run<'a>(txs: &'a [Transaction], tolerance: &str) -> SettlementReport<'a> {
        let receipts: LabelSet = [labels::RECEIPT].into_iter().collect();
        let fees: LabelSet = [labels::SERVICE_FEE].into_iter().collect();
        let outbound: LabelSet = [labels::PIX_TRANSFER].into_iter().collect();

        let pairing = pair(txs, &receipts, &fees);
        match_settlements(&pairing, outbound_transfers(txs, &outbound), &dec(tolerance))
    }

    #[test]
    fn test_single_receipt_matches_transfer() {
        let txs = vec![
            tx("r1", labels::RECEIPT, "100.00", "2024-01-01 09:00", Some("A")),
            tx("f1", labels::SERVICE_FEE, "-5.00", "2024-01-01 09:00", Some("A")),
            tx("p1", labels::PIX_TRANSFER, "-95.00", "2024-01-01 18:30", None),
        ];

        let report = run(&txs, "0.01");

        assert_eq!(report.matches.len(), 1);
        let m = &report.matches[0];
        assert_eq!(m.receipt.id, "r1");
        assert_eq!(m.fee.id, "f1");
        assert_eq!(m.net, dec("95.00"));
        assert_eq!(m.candidates.len(), 1);
        assert_eq!(m.candidates[0].id, "p1");
        assert!(report.unmatched.is_empty());
        assert!(report.ambiguities.is_empty());
    }

    #[rstest]
    #[case::exact("-95.00", true)]
    #[case::one_cent_below("-94.99", true)]
    #[case::one_cent_above("-95.01", true)]
    #[case::just_outside("-95.011", false)]
    #[case::just_outside_below("-94.989", false)]
    #[case::positive_sign_ignored("95.00", true)]
    fn test_tolerance_boundary(#[case] transfer: &str, #[case] expected: bool) {
        let txs = vec![
            tx("r1", labels::RECEIPT, "100.00", "2024-01-01 09:00", Some("A")),
            tx("f1", labels::SERVICE_FEE, "-5.00", "2024-01-01 09:00", Some("A")),
            tx("p1", labels::PIX_TRANSFER, transfer, "2024-01-01 10:00", None),
        ];

        let report = run(&txs, "0.01");

        assert_eq!(report.matches.len() == 1, expected);
        assert_eq!(report.unmatched.len() == 1, !expected);
    }

    #[test]
    fn test_other_day_transfer_ignored() {
        let txs = vec![
            tx("r1", labels::RECEIPT, "100.00", "2024-01-01 23:59", Some("A")),
            tx("f1", labels::SERVICE_FEE, "-5.00", "2024-01-01 23:59", Some("A")),
            tx("p1", labels::PIX_TRANSFER, "-95.00", "2024-01-02 00:01", None),
        ];

        let report = run(&txs, "0.01");

        assert!(report.matches.is_empty());
        assert_eq!(report.unmatched.len(), 1);
        assert_eq!(report.unmatched[0].net, dec("95.00"));
    }

    #[test]
    fn test_unpaired_receipt_never_considered() {
        let txs = vec![
            tx("r1", labels::RECEIPT, "50.00", "2024-01-01 09:00", Some("B")),
            tx("p1", labels::PIX_TRANSFER, "-50.00", "2024-01-01 10:00", None),
        ];

        let report = run(&txs, "0.01");

        assert!(report.matches.is_empty());
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn test_transfer_shared_between_receipts() {
        let txs = vec![
            tx("r1", labels::RECEIPT, "20.00", "2024-02-05 09:00", Some("A")),
            tx("f1", labels::SERVICE_FEE, "-1.00", "2024-02-05 09:00", Some("A")),
            tx("r2", labels::RECEIPT, "19.50", "2024-02-05 11:00", Some("B")),
            tx("f2", labels::SERVICE_FEE, "-0.50", "2024-02-05 11:00", Some("B")),
            tx("p1", labels::PIX_TRANSFER, "-19.00", "2024-02-05 17:00", None),
            tx("p2", labels::PIX_TRANSFER, "-19.01", "2024-02-05 17:05", None),
        ];

        let report = run(&txs, "0.01");

        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.candidate_count(), 4);
        let shared = report.shared_transfers();
        assert_eq!(shared.len(), 2);
        assert!(shared.iter().all(|(_, count)| *count == 2));
        assert!(!report.is_exclusive());
    }

    #[test]
    fn test_multiple_fees_use_earliest_and_report() {
        let txs = vec![
            tx("r1", labels::RECEIPT, "80.00", "2024-01-03 09:00", Some("C")),
            tx("f2", labels::SERVICE_FEE, "-3.00", "2024-01-03 09:05", Some("C")),
            tx("f1", labels::SERVICE_FEE, "-2.00", "2024-01-03 09:01", Some("C")),
            tx("p1", labels::PIX_TRANSFER, "-78.00", "2024-01-03 20:00", None),
        ];

        let report = run(&txs, "0.01");

        assert_eq!(report.ambiguities.len(), 1);
        let ambiguity = &report.ambiguities[0];
        assert_eq!(ambiguity.key, "C");
        assert_eq!(ambiguity.chosen.id, "f1");
        assert_eq!(ambiguity.competing.len(), 1);
        assert_eq!(ambiguity.competing[0].id, "f2");

        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].net, dec("78.00"));
    }

    #[test]
    fn test_net_is_rounded() {
        let txs = vec![
            tx("r1", labels::RECEIPT, "10.005", "2024-01-01 09:00", Some("A")),
            tx("f1", labels::SERVICE_FEE, "-0.000", "2024-01-01 09:00", Some("A")),
        ];

        let report = run(&txs, "0.01");
        assert_eq!(report.unmatched[0].net, dec("10.01"));
    }

    #[test]
    fn test_negative_tolerance_clamped() {
        let txs = vec![
            tx("r1", labels::RECEIPT, "10.00", "2024-01-01 09:00", Some("A")),
            tx("f1", labels::SERVICE_FEE, "-1.00", "2024-01-01 09:00", Some("A")),
            tx("p1", labels::PIX_TRANSFER, "-9.00", "2024-01-01 10:00", None),
        ];

        let report = run(&txs, "-1");

        assert_eq!(report.tolerance, BigDecimal::from(0));
        assert_eq!(report.matches.len(), 1);
    }

    #[test]
    fn test_within_tolerance() {
        assert!(within_tolerance(&dec("-95.01"), &dec("95.00"), &dec("0.01")));
        assert!(!within_tolerance(&dec("-95.011"), &dec("95.00"), &dec("0.01")));
    }
}
