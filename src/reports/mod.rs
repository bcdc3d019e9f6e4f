//! Reports module for milk-ledger
//!
//! Provides the grouped production report and the plain entry log.

pub mod entry_log;
pub mod production;

pub use production::{ProductionReport, ReportOutcome, ReportRow};
