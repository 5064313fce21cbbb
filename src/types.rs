//! Core types and data structures for the reconciliation system

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Number of decimal places used for currency amounts (minor units)
pub const CURRENCY_SCALE: i64 = 2;

/// One row of the movement ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque movement identifier as supplied by the source
    pub id: String,
    /// Date and time the operation was settled
    pub timestamp: NaiveDateTime,
    /// Operation-type label (e.g. "Recebimento")
    pub operation_type: String,
    /// Signed amount; fees and outflows are usually negative
    pub amount: BigDecimal,
    /// Identifier of the external operation this row belongs to
    pub related_key: Option<String>,
    /// Free-text description
    pub description: Option<String>,
}

impl Transaction {
    /// Create a new transaction without relation key or description
    pub fn new(
        id: String,
        timestamp: NaiveDateTime,
        operation_type: String,
        amount: BigDecimal,
    ) -> Self {
        Self {
            id,
            timestamp,
            operation_type,
            amount,
            related_key: None,
            description: None,
        }
    }

    /// Set the relation key
    pub fn with_related_key(mut self, key: String) -> Self {
        self.related_key = Some(key);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    /// Calendar day of the operation
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Weekday of the operation
    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }

    /// Relation key, treating blank keys as absent
    pub fn key(&self) -> Option<&str> {
        self.related_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Absolute value of the amount
    pub fn abs_amount(&self) -> BigDecimal {
        self.amount.abs()
    }
}

/// Income/expense classification of an operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Money coming into the account
    Income,
    /// Money leaving the account
    Expense,
    /// Label not present in either table
    Unclassified,
}

/// Round an amount to currency precision (half away from zero)
pub fn round_currency(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(CURRENCY_SCALE, RoundingMode::HalfUp)
}

/// Divide, yielding zero when the divisor is zero
pub fn safe_div(numerator: &BigDecimal, denominator: &BigDecimal) -> BigDecimal {
    if *denominator == BigDecimal::from(0) {
        BigDecimal::from(0)
    } else {
        numerator / denominator
    }
}

/// Errors raised at the fallible edges of the library (configuration, import)
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Import error on line {line}: {message}")]
    Import { line: usize, message: String },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Label classified as both income and expense: {0}")]
    OverlappingLabel(String),
}

/// Result type for fallible reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;
