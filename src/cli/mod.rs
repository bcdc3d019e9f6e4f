//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod entry;
pub mod finance;
pub mod report;

pub use backup::{handle_backup_command, BackupCommands};
pub use entry::{handle_entry_command, EntryCommands};
pub use finance::{handle_finance_command, FinanceCommands};
pub use report::{handle_report_command, ReportArgs};

use crate::services::Persisted;

/// Tell the user when a change was applied but could not be saved
pub(crate) fn warn_if_unsaved<T>(persisted: &Persisted<T>) {
    if let Some(err) = &persisted.save_error {
        eprintln!("Warning: the change could not be saved and will be lost on exit.");
        eprintln!("  {}", err);
    }
}
