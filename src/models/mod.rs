//! Core data models for milk-ledger
//!
//! This module contains the data structures of the milk-production domain:
//! entries, their identifiers, the persisted state document and the report
//! granularity, plus validation of raw user input.

pub mod entry;
pub mod granularity;
pub mod ids;
pub mod input;
pub mod state;

pub use entry::{Entry, NewEntry};
pub use granularity::Granularity;
pub use ids::EntryId;
pub use state::{AppState, LoadedState};
