//! Service layer for milk-ledger
//!
//! The service layer sits on top of the storage layer: the entry store,
//! pure aggregation over entries, and the session that ties mutations to
//! persistence.

pub mod aggregate;
pub mod entries;
pub mod session;

pub use aggregate::Financials;
pub use entries::EntryStore;
pub use session::{Confirmation, Persisted, Session};
