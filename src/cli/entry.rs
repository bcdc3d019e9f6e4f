//! Entry CLI commands
//!
//! Implements CLI commands for recording, listing and deleting entries.

use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;

use crate::display::{format_entry_details, format_entry_table, format_kg_precise, format_total};
use crate::error::{MilkError, MilkResult};
use crate::models::input::{parse_animal_count, parse_quantity, parse_timestamp};
use crate::models::NewEntry;
use crate::reports::entry_log;
use crate::services::{Confirmation, Session};
use crate::storage::StateStore;

use super::warn_if_unsaved;

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Record a milk measurement
    Add {
        /// Quantity in kilograms
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        /// Number of animals milked (default 1)
        #[arg(short, long, allow_hyphen_values = true)]
        animals: Option<String>,
        /// Measurement time (YYYY-MM-DD, YYYY-MM-DDTHH:MM or "YYYY-MM-DD HH:MM"); default now
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Preview the per-animal quantity without recording anything
    Calc {
        /// Quantity in kilograms
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        /// Number of animals milked (default 1)
        #[arg(short, long, allow_hyphen_values = true)]
        animals: Option<String>,
    },

    /// List recent entries, newest first
    List {
        /// Number of entries to show (default from settings)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Show every entry
        #[arg(long, conflicts_with = "limit")]
        all: bool,
    },

    /// Show the total of all recorded milk
    Total,

    /// Delete an entry
    Delete {
        /// Entry ID (full, ent-xxxxxxxx, or a unique prefix)
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete every entry
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Write every entry to a plain-text log
    Export {
        /// Output file
        file: PathBuf,
    },
}

/// Handle an entry command
pub fn handle_entry_command<S: StateStore>(
    session: &mut Session<S>,
    cmd: EntryCommands,
) -> MilkResult<()> {
    match cmd {
        EntryCommands::Add {
            quantity,
            animals,
            date,
        } => {
            let quantity = parse_quantity(&quantity)?;
            let animals = parse_animal_count(animals.as_deref().unwrap_or(""))?;
            let date = match date {
                Some(raw) => parse_timestamp(&raw)?,
                None => Local::now().naive_local(),
            };

            let added = session.add_entry(NewEntry::new(quantity, date).with_animals(animals))?;
            println!("Recorded entry {}", added.value.id);
            print!("{}", format_entry_details(&added.value));
            warn_if_unsaved(&added);
        }

        EntryCommands::Calc { quantity, animals } => {
            let quantity = parse_quantity(&quantity)?;
            let animals = parse_animal_count(animals.as_deref().unwrap_or(""))?;
            println!(
                "Per animal: {}",
                format_kg_precise(quantity / f64::from(animals))
            );
        }

        EntryCommands::List { limit, all } => {
            let entries = if all {
                session.entries()
            } else {
                match limit {
                    Some(n) => &session.entries()[..n.min(session.entries().len())],
                    None => session.recent_entries(),
                }
            };

            println!("{}", format_entry_table(entries));
            if entries.len() < session.entries().len() {
                println!(
                    "Showing {} of {} entries. Use --all to see every entry.",
                    entries.len(),
                    session.entries().len()
                );
            }
        }

        EntryCommands::Total => {
            println!(
                "{}",
                format_total(session.total_quantity(), session.entries().len())
            );
        }

        EntryCommands::Delete { id, force } => {
            let entry = session.find_entry(&id)?.clone();
            print!("{}", format_entry_details(&entry));
            println!();

            match session.delete_entry(&id, Confirmation::from_force(force))? {
                None => {
                    println!("To delete this entry, run again with --force flag:");
                    println!("  milk delete {} --force", id);
                }
                Some(deleted) => {
                    println!("Deleted entry {}", deleted.value.id);
                    warn_if_unsaved(&deleted);
                }
            }
        }

        EntryCommands::Clear { force } => {
            let count = session.entries().len();
            if count == 0 {
                println!("No entries to clear.");
                return Ok(());
            }

            match session.clear_entries(Confirmation::from_force(force)) {
                None => {
                    println!("WARNING: This will delete all {} entries!", count);
                    println!("To proceed, run again with --force flag:");
                    println!("  milk clear --force");
                }
                Some(cleared) => {
                    println!("Deleted {} entries.", cleared.value);
                    warn_if_unsaved(&cleared);
                }
            }
        }

        EntryCommands::Export { file } => {
            std::fs::write(&file, entry_log::render(session.entries())).map_err(|e| {
                MilkError::Export(format!("Failed to write {}: {}", file.display(), e))
            })?;
            println!(
                "Exported {} entries to {}",
                session.entries().len(),
                file.display()
            );
        }
    }

    Ok(())
}
