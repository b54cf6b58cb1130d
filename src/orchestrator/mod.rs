//! Aggregation orchestration: one poll cycle from fetch to board entries.

pub mod label;
pub mod run;

pub use run::Aggregator;
