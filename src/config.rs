//! Reconciliation configuration: taxonomy, label sets and numeric thresholds

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::classification::{labels, Taxonomy};
use crate::traits::*;
use crate::types::*;

/// Configuration for a reconciliation run
///
/// Every field has a default matching Mercado Pago movement exports, so a
/// JSON file only needs to list what differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Income/expense tables used by the summary
    pub taxonomy: Taxonomy,
    /// Operation types treated as receipts
    pub receipt_types: LabelSet,
    /// Operation types treated as service fees
    pub fee_types: LabelSet,
    /// Operation types treated as outbound transfers
    pub outbound_types: LabelSet,
    /// Maximum difference between a net amount and a transfer
    pub tolerance: BigDecimal,
    /// Inflows strictly above this amount are listed as large entries
    pub large_entry_threshold: BigDecimal,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            taxonomy: Taxonomy::default(),
            receipt_types: [labels::RECEIPT].into_iter().collect(),
            fee_types: [labels::SERVICE_FEE].into_iter().collect(),
            outbound_types: [
                labels::PIX_TRANSFER,
                labels::PAYMENT,
                labels::DISCOUNTED_PAYMENT,
            ]
            .into_iter()
            .collect(),
            tolerance: default_tolerance(),
            large_entry_threshold: BigDecimal::from(59),
        }
    }
}

impl ReconciliationConfig {
    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> ReconcileResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> ReconcileResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading reconciliation config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the label sets for contradictions
    pub fn validate(&self) -> ReconcileResult<()> {
        if let Some(label) = self.receipt_types.intersection(&self.fee_types).next() {
            return Err(ReconcileError::Validation(format!(
                "Operation type '{}' cannot be both a receipt and a fee",
                label
            )));
        }

        if self.tolerance < BigDecimal::from(0) {
            return Err(ReconcileError::Validation(format!(
                "Tolerance must not be negative: {}",
                self.tolerance
            )));
        }

        Ok(())
    }
}

/// One currency minor unit
pub fn default_tolerance() -> BigDecimal {
    BigDecimal::new(1.into(), CURRENCY_SCALE)
}
