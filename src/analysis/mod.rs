//! Analysis modules.
//!
//! Numeric column accumulation over parsed capture rows.

pub mod aggregator;

pub use aggregator::*;
