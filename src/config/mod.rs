//! Configuration module for milk-ledger
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings with default-filling and shallow-merge semantics

pub mod paths;
pub mod settings;

pub use paths::MilkPaths;
pub use settings::Settings;
