//! Reconciliation of receipts, fees and outbound transfers
//!
//! [`ReconciliationEngine`] owns a [`ReconciliationConfig`] and runs the whole
//! pipeline: pairing by relation key, same-day settlement matching, weekday and
//! summary aggregation. Each step is also available as a free function.

pub mod pairing;
pub mod settlement;

pub use pairing::*;
pub use settlement::*;

use serde::Serialize;

use crate::config::ReconciliationConfig;
use crate::reporting::*;
use crate::types::*;

/// Everything computed for one transaction list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport<'a> {
    pub summary: SummaryStats,
    pub pairing: PairingResult<'a>,
    pub settlements: SettlementReport<'a>,
    pub weekdays: WeekdayBreakdown,
    pub large_entries: LargeEntryReport<'a>,
}

/// Reconciliation pipeline driven by a configuration
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: ReconciliationConfig,
}

impl ReconciliationEngine {
    /// Create an engine with the given configuration
    pub fn new(config: ReconciliationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Classify an operation-type label
    pub fn classify(&self, label: &str) -> Classification {
        self.config.taxonomy.classify(label)
    }

    /// Partition receipts and fees by relation key
    pub fn pair<'a>(&self, transactions: &'a [Transaction]) -> PairingResult<'a> {
        pair(
            transactions,
            &self.config.receipt_types,
            &self.config.fee_types,
        )
    }

    /// Outbound transfers in source order
    pub fn outbound_transfers<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        outbound_transfers(transactions, &self.config.outbound_types)
    }

    /// Match paired receipts against the outbound transfers of `transactions`
    pub fn match_settlements<'a>(
        &self,
        pairing: &PairingResult<'a>,
        transactions: &'a [Transaction],
    ) -> SettlementReport<'a> {
        match_settlements(
            pairing,
            self.outbound_transfers(transactions),
            &self.config.tolerance,
        )
    }

    pub fn aggregate_by_weekday(&self, pairing: &PairingResult<'_>) -> WeekdayBreakdown {
        aggregate_by_weekday(pairing)
    }

    pub fn summarize(
        &self,
        transactions: &[Transaction],
        pairing: &PairingResult<'_>,
    ) -> SummaryStats {
        summarize(transactions, &self.config.taxonomy, pairing)
    }

    pub fn large_entries<'a>(&self, transactions: &'a [Transaction]) -> LargeEntryReport<'a> {
        large_entries(
            transactions,
            &self.config.large_entry_threshold,
            &self.config.fee_types,
        )
    }

    /// Run every step over a transaction list
    pub fn run<'a>(&self, transactions: &'a [Transaction]) -> ReconciliationReport<'a> {
        tracing::info!(transactions = transactions.len(), "starting reconciliation");

        let pairing = self.pair(transactions);
        let settlements = self.match_settlements(&pairing, transactions);
        let weekdays = self.aggregate_by_weekday(&pairing);
        let summary = self.summarize(transactions, &pairing);
        let large_entries = self.large_entries(transactions);

        tracing::info!(
            paired_receipts = pairing.paired_receipts.len(),
            settled = settlements.matches.len(),
            unsettled = settlements.unmatched.len(),
            balance = %summary.balance,
            "reconciliation finished"
        );

        ReconciliationReport {
            summary,
            pairing,
            settlements,
            weekdays,
            large_entries,
        }
    }
}
