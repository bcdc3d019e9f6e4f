//! Backup CLI commands
//!
//! Implements CLI commands for local backup files, restore and the
//! simulated cloud backup.

use std::time::Duration;

use clap::Subcommand;

use crate::backup::{BackupManager, CloudBackup};
use crate::config::paths::MilkPaths;
use crate::error::MilkResult;
use crate::services::{Confirmation, Session};
use crate::storage::StateStore;

use super::warn_if_unsaved;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup
    Create,

    /// List all available backups
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore from a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show information about a specific backup
    Info {
        /// Backup filename or path
        backup: String,
    },

    /// Delete old backups beyond the retention count
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Run the simulated cloud backup
    Cloud {
        /// Simulated upload time in milliseconds
        #[arg(long, default_value_t = 1500)]
        delay_ms: u64,
    },
}

/// Handle a backup command
pub fn handle_backup_command<S: StateStore>(
    paths: &MilkPaths,
    session: &mut Session<S>,
    cmd: BackupCommands,
) -> MilkResult<()> {
    let manager = BackupManager::new(paths);

    match cmd {
        BackupCommands::Create => {
            println!("Creating backup...");
            let backup_path = manager.create_backup(&session.snapshot())?;
            let filename = backup_path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| backup_path.display().to_string());
            println!("Backup created: {}", filename);
            println!("Location: {}", backup_path.display());
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: milk backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);
                let age_str = format_duration(age);

                if verbose {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        age_str,
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        age_str,
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = manager.resolve(&backup)?;
            let payload = manager.read_payload(&backup_path)?;

            println!("Backup Information");
            println!("==================");
            println!("File: {}", backup_path.display());
            println!("Contents: {}", payload.summary());
            println!();

            if !force {
                println!(
                    "WARNING: This will replace all {} current entries!",
                    session.entries().len()
                );
                println!("To proceed, run again with --force flag:");
                println!("  milk backup restore {} --force", backup);
                return Ok(());
            }

            println!("Creating backup of current data before restore...");
            let pre_restore_backup = manager.create_backup(&session.snapshot())?;
            println!("Pre-restore backup saved: {}", pre_restore_backup.display());
            println!();

            if let Some(restored) = session.restore(payload, Confirmation::Confirmed)? {
                println!("Restore complete! {} entries restored.", restored.value);
                warn_if_unsaved(&restored);
            }
        }

        BackupCommands::Info { backup } => {
            let backup_path = manager.resolve(&backup)?;
            let payload = manager.read_payload(&backup_path)?;
            let metadata = std::fs::metadata(&backup_path)?;

            println!("Backup Details");
            println!("==============");
            println!("File: {}", backup_path.display());
            println!("Size: {}", format_size(metadata.len()));
            println!("Contents: {}", payload.summary());
            println!(
                "Settings: {}",
                if payload.has_settings() { "Yes" } else { "No" }
            );
        }

        BackupCommands::Prune { force } => {
            let backups = manager.list_backups()?;
            let keep = session.settings().backup_keep as usize;
            let to_delete = backups.len().saturating_sub(keep);

            if to_delete == 0 {
                println!("No backups to prune.");
                println!(
                    "Retention keeps the newest {} backups; you have {}.",
                    keep,
                    backups.len()
                );
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!("Retention: keep newest {}", keep);
            println!("Current backups: {}", backups.len());
            println!("To be deleted: {}", to_delete);
            println!();

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  milk backup prune --force");
                return Ok(());
            }

            let deleted = manager.enforce_retention(keep)?;
            println!("Deleted {} backup(s).", deleted.len());
        }

        BackupCommands::Cloud { delay_ms } => {
            println!("Creating cloud backup...");
            let cloud = CloudBackup::new(Duration::from_millis(delay_ms));
            let finished = session.cloud_backup(&cloud)?;
            println!(
                "Cloud backup completed at {}",
                finished.value.format("%Y-%m-%d %H:%M:%S UTC")
            );
            warn_if_unsaved(&finished);
        }
    }

    Ok(())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
