//! Table-driven income/expense classification of operation types

use serde::{Deserialize, Serialize};

use crate::traits::*;
use crate::types::*;

/// Operation-type labels used by Mercado Pago movement exports
pub mod labels {
    pub const GROSS_YIELD: &str = "Rendimento bruto";
    pub const RECEIPT: &str = "Recebimento";
    pub const MONEY_ADDED: &str = "Adição de dinheiro";
    pub const GENERAL_MOVEMENT: &str = "Movimentação geral";
    pub const INCOME_TAX: &str = "Imposto de renda";
    pub const SERVICE_FEE: &str = "Tarifa do Mercado Pago";
    pub const PAYMENT: &str = "Pagamento";
    pub const DISCOUNTED_PAYMENT: &str = "Pagamento com desconto recebido";
    pub const PIX_TRANSFER: &str = "Transferência via Pix";
}

/// Fixed income/expense label tables
///
/// The two sets are disjoint; labels found in neither are [`Classification::Unclassified`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Taxonomy {
    income: LabelSet,
    expense: LabelSet,
}

impl Taxonomy {
    /// Create a taxonomy, rejecting labels listed as both income and expense
    pub fn new(income: LabelSet, expense: LabelSet) -> ReconcileResult<Self> {
        if let Some(label) = income.intersection(&expense).next() {
            return Err(ReconcileError::OverlappingLabel(label.to_string()));
        }

        Ok(Self { income, expense })
    }

    /// Classify an operation-type label
    pub fn classify(&self, label: &str) -> Classification {
        if self.income.contains(label) {
            Classification::Income
        } else if self.expense.contains(label) {
            Classification::Expense
        } else {
            Classification::Unclassified
        }
    }

    /// Classify a transaction by its operation type
    pub fn classify_transaction(&self, transaction: &Transaction) -> Classification {
        self.classify(&transaction.operation_type)
    }

    /// Income labels
    pub fn income_labels(&self) -> &LabelSet {
        &self.income
    }

    /// Expense labels
    pub fn expense_labels(&self) -> &LabelSet {
        &self.expense
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            income: [
                labels::GROSS_YIELD,
                labels::RECEIPT,
                labels::MONEY_ADDED,
                labels::GENERAL_MOVEMENT,
            ]
            .into_iter()
            .collect(),
            expense: [
                labels::INCOME_TAX,
                labels::SERVICE_FEE,
                labels::PAYMENT,
                labels::DISCOUNTED_PAYMENT,
                labels::PIX_TRANSFER,
            ]
            .into_iter()
            .collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawTaxonomy {
    #[serde(default)]
    income: LabelSet,
    #[serde(default)]
    expense: LabelSet,
}

impl<'de> Deserialize<'de> for Taxonomy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawTaxonomy::deserialize(deserializer)?;
        Taxonomy::new(raw.income, raw.expense).map_err(serde::de::Error::custom)
    }
}
