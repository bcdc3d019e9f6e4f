//! Persisted application state
//!
//! The whole ledger is one document: the entry list (newest first) and the
//! settings. The same shape is used for the state file and for backups.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::Entry;
use crate::config::settings::Settings;
use crate::error::{MilkError, MilkResult};

/// Entries plus settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Recorded measurements, most recent first
    #[serde(default)]
    pub entries: Vec<Entry>,

    /// Process-wide settings
    #[serde(default)]
    pub settings: Settings,
}

/// A stored document read back with per-row tolerance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedState {
    pub state: AppState,
    /// One line per entry or setting that could not be read
    pub skipped: Vec<String>,
}

impl LoadedState {
    /// Whether every entry and setting was read
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl AppState {
    /// Create a state with the given entries and default settings
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            settings: Settings::default(),
        }
    }

    /// Read a stored document, skipping rows that fail validation
    ///
    /// Only a document whose overall shape is wrong is an error. Entry rows
    /// and settings keys that cannot be read are dropped and listed in
    /// [`LoadedState::skipped`].
    pub fn recover(document: Value) -> MilkResult<LoadedState> {
        let Value::Object(mut document) = document else {
            return Err(MilkError::Persistence(
                "Stored data is not a JSON object".into(),
            ));
        };

        let rows = match document.remove("entries") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(rows)) => rows,
            Some(_) => {
                return Err(MilkError::Persistence(
                    "Stored field 'entries' is not a list".into(),
                ))
            }
        };

        let mut skipped = Vec::new();
        let mut entries = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            match serde_json::from_value::<Entry>(row) {
                Ok(entry) if entries.iter().any(|e: &Entry| e.id == entry.id) => {
                    skipped.push(format!("entry {}: duplicate id {}", index + 1, entry.id))
                }
                Ok(entry) => entries.push(entry),
                Err(e) => skipped.push(format!("entry {}: {}", index + 1, e)),
            }
        }

        let stored_settings = document.remove("settings").unwrap_or(Value::Null);
        let (settings, skipped_settings) = Settings::recover(&stored_settings);
        skipped.extend(skipped_settings);

        Ok(LoadedState {
            state: AppState { entries, settings },
            skipped,
        })
    }
}
