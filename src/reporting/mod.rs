//! Aggregations over classified and paired transactions

pub mod large_entries;
pub mod summary;
pub mod weekday;

pub use large_entries::*;
pub use summary::*;
pub use weekday::*;
