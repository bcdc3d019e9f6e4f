//! Audit logging for milk-ledger
//!
//! Records every change to the ledger (entries created or deleted, the list
//! cleared, a backup restored, settings updated) in an append-only log.
//!
//! - `AuditEntry`: one logged operation with optional before/after values
//! - `AuditLogger`: writes entries as line-delimited JSON (JSONL)
//! - `generate_diff`: one-line summary of a settings change
//!
//! # Example
//!
//! ```rust,ignore
//! use milk_ledger::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::create(EntityType::Entry, entry.id.to_string(), None, &entry);
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
