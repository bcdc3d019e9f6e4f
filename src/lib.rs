//! milk-ledger - milk production tracker
//!
//! This library provides the core of the `milk` command-line application:
//! recording milk measurements, aggregating them into totals, per-animal
//! averages and revenue, building production reports, and backing up or
//! restoring the whole ledger.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and settings
//! - `error`: Custom error types
//! - `models`: Entries, identifiers, the persisted state document, input parsing
//! - `storage`: The persistence collaborator and its JSON file implementation
//! - `services`: Entry store, aggregation and the session controller
//! - `reports`: Production report and entry log
//! - `backup`: Backup codec, local backup files and simulated cloud backup
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use milk_ledger::models::NewEntry;
//! use milk_ledger::services::Session;
//! use milk_ledger::storage::MemoryStore;
//!
//! let mut session = Session::open(MemoryStore::new());
//! session.add_entry(NewEntry::new(12.5, now).with_animals(3))?;
//! println!("{:.1} kg", session.total_quantity());
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{MilkError, MilkResult};
