//! Utility modules

pub mod import;
pub mod validation;

pub use import::*;
pub use validation::*;
