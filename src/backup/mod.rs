//! Backup system for milk-ledger
//!
//! # Architecture
//!
//! - `codec`: encodes the full state and validates restore payloads
//! - `BackupManager`: writes dated backup files and prunes old ones
//! - `CloudBackup`: simulated remote backup with a fixed delay
//!
//! # Backup Format
//!
//! A backup is the persisted `{entries, settings}` document, pretty-printed.
//! Restoring replaces every entry and shallow-merges the saved settings over
//! the current ones.
//!
//! # Example
//!
//! ```rust,ignore
//! use milk_ledger::backup::{BackupManager, codec};
//!
//! let manager = BackupManager::new(&paths);
//! let path = manager.create_backup(session.snapshot())?;
//! let payload = manager.read_payload(&path)?;
//! println!("{}", payload.summary());
//! ```

pub mod cloud;
pub mod codec;
mod manager;

pub use cloud::CloudBackup;
pub use codec::RestorePayload;
pub use manager::{BackupInfo, BackupManager};
