//! # Reconcile Core
//!
//! Reconciliation of a financial movement ledger: receipts are paired with the
//! service fees charged on them, net amounts are matched against outbound
//! transfers made on the same day, and totals are aggregated by operation type
//! and by weekday.
//!
//! ## Features
//!
//! - **Classification**: table-driven income/expense taxonomy, injectable per run
//! - **Pairing**: receipts and fees partitioned into paired, unpaired and keyless
//!   groups by relation key
//! - **Settlement matching**: net receipt values compared with same-day transfers
//!   within a one-cent tolerance, reported as candidates rather than an assignment
//! - **Reporting**: weekday breakdown, global summary, large inflow listing
//! - **Import**: CSV loader for movement exports
//!
//! ## Quick Start
//!
//! ```rust
//! use reconcile_core::{ReconciliationEngine, Transaction};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let at = NaiveDate::from_ymd_opt(2024, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(9, 0, 0)
//!     .unwrap();
//! let movement = |id: &str, kind: &str, amount: i32| {
//!     Transaction::new(id.to_string(), at, kind.to_string(), BigDecimal::from(amount))
//! };
//! let transactions = vec![
//!     movement("1", "Recebimento", 100).with_related_key("A".to_string()),
//!     movement("2", "Tarifa do Mercado Pago", -5).with_related_key("A".to_string()),
//!     movement("3", "Transferência via Pix", -95),
//! ];
//!
//! let report = ReconciliationEngine::default().run(&transactions);
//! assert_eq!(report.settlements.matches.len(), 1);
//! ```

pub mod classification;
pub mod config;
pub mod reconciliation;
pub mod reporting;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use classification::*;
pub use config::*;
pub use reconciliation::*;
pub use reporting::*;
pub use traits::*;
pub use types::*;
