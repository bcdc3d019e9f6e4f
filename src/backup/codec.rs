//! Backup encoding
//!
//! A backup is the full `{entries, settings}` document as pretty-printed
//! JSON. Decoding validates everything up front so that a restore either
//! applies a well-formed payload or fails without touching current state.

use std::collections::HashSet;

use serde_json::Value;

use crate::config::settings::Settings;
use crate::error::{MilkError, MilkResult};
use crate::models::{AppState, Entry};

/// Decoded contents of a backup, ready to be applied
#[derive(Debug, Clone, PartialEq)]
pub struct RestorePayload {
    /// Entries to install, in stored order
    pub entries: Vec<Entry>,
    /// Raw settings object to merge over the current settings (`Null` if absent)
    pub settings: Value,
}

impl RestorePayload {
    /// One-line description of the payload
    pub fn summary(&self) -> String {
        let dates = self.entries.iter().map(|e| e.date);
        match (dates.clone().min(), dates.max()) {
            (Some(first), Some(last)) => format!(
                "{} entries, {} to {}",
                self.entries.len(),
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            ),
            _ => "0 entries".to_string(),
        }
    }

    /// Whether the payload carries a settings block
    pub fn has_settings(&self) -> bool {
        self.settings.is_object()
    }
}

/// Encode the full state as pretty JSON
pub fn serialize(state: &AppState) -> MilkResult<String> {
    serde_json::to_string_pretty(state)
        .map_err(|e| MilkError::Json(format!("Failed to serialize backup: {}", e)))
}

/// Decode and validate backup text
pub fn deserialize(text: &str) -> MilkResult<RestorePayload> {
    let document: Value = serde_json::from_str(text)
        .map_err(|e| MilkError::BackupFormat(format!("Backup is not valid JSON: {}", e)))?;

    let Value::Object(mut document) = document else {
        return Err(MilkError::BackupFormat(
            "Backup must be a JSON object".into(),
        ));
    };

    let raw_entries = match document.remove("entries") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(MilkError::BackupFormat(
                "Backup field 'entries' must be a list".into(),
            ))
        }
        None => {
            return Err(MilkError::BackupFormat(
                "Backup is missing the 'entries' field".into(),
            ))
        }
    };

    let mut entries = Vec::with_capacity(raw_entries.len());
    let mut seen = HashSet::new();
    for (index, raw) in raw_entries.into_iter().enumerate() {
        let entry: Entry = serde_json::from_value(raw).map_err(|e| {
            MilkError::BackupFormat(format!("Entry {} is invalid: {}", index + 1, e))
        })?;
        if !seen.insert(entry.id) {
            return Err(MilkError::BackupFormat(format!(
                "Entry {} has duplicate id {}",
                index + 1,
                entry.id
            )));
        }
        entries.push(entry);
    }

    let settings = match document.remove("settings") {
        None | Some(Value::Null) => Value::Null,
        Some(obj @ Value::Object(_)) => obj,
        Some(_) => {
            return Err(MilkError::BackupFormat(
                "Backup field 'settings' must be an object".into(),
            ))
        }
    };

    Settings::default()
        .merged_with(&settings)
        .map_err(|e| MilkError::BackupFormat(format!("Backup settings are invalid: {}", e)))?;

    Ok(RestorePayload { entries, settings })
}
