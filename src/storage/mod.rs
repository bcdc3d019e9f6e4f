//! Storage layer for milk-ledger
//!
//! The persistence collaborator is a key-value slot holding the serialized
//! `{entries, settings}` document. [`JsonFileStore`] keeps it in a JSON file
//! with atomic writes; [`MemoryStore`] keeps it in memory for tests and
//! embedding.

pub mod file_io;

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Local;
use serde_json::Value;

pub use file_io::{read_json_optional, write_json_atomic};

use crate::error::MilkError;
use crate::models::{AppState, LoadedState};

/// Durable home of the application state
pub trait StateStore {
    /// Read the persisted state; `Ok(None)` when nothing has been saved yet
    ///
    /// Rows that cannot be read are skipped and listed in the result.
    fn load(&self) -> Result<Option<LoadedState>, MilkError>;

    /// Replace the persisted state
    fn save(&self, state: &AppState) -> Result<(), MilkError>;

    /// Copy the stored document somewhere it will not be overwritten
    ///
    /// Returns where the copy went, or `None` when nothing is stored.
    fn set_aside(&self) -> Result<Option<String>, MilkError>;
}

/// State stored as a single JSON file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// `<file>.corrupt-YYYYMMDD-HHMMSS` next to the data file
    fn set_aside_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "data.json".to_string());
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        self.path.with_file_name(format!("{}.corrupt-{}", name, stamp))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<LoadedState>, MilkError> {
        match read_json_optional::<Value, _>(&self.path)? {
            Some(document) => AppState::recover(document).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, state: &AppState) -> Result<(), MilkError> {
        write_json_atomic(&self.path, state)
    }

    fn set_aside(&self) -> Result<Option<String>, MilkError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let target = self.set_aside_path();
        fs::copy(&self.path, &target).map_err(|e| {
            MilkError::Persistence(format!(
                "Failed to copy {} to {}: {}",
                self.path.display(),
                target.display(),
                e
            ))
        })?;
        Ok(Some(target.display().to_string()))
    }
}

/// In-memory store holding the serialized document
#[derive(Default)]
pub struct MemoryStore {
    document: Mutex<Option<String>>,
    set_aside: Mutex<Vec<String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with raw document text
    pub fn with_document(text: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(text.into())),
            ..Self::default()
        }
    }

    /// Make subsequent writes fail (simulates a full or read-only disk)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw text of the stored document
    pub fn document(&self) -> Option<String> {
        self.document.lock().ok().and_then(|doc| doc.clone())
    }

    /// Documents copied away by [`StateStore::set_aside`], oldest first
    pub fn set_aside_documents(&self) -> Vec<String> {
        self.set_aside
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    fn check_writable(&self) -> Result<(), MilkError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MilkError::Persistence("Storage is not writable".into()));
        }
        Ok(())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<LoadedState>, MilkError> {
        let document = self
            .document
            .lock()
            .map_err(|e| MilkError::Persistence(format!("Failed to acquire lock: {}", e)))?;

        let Some(text) = document.as_deref() else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(text)
            .map_err(|e| MilkError::Persistence(format!("Failed to parse stored data: {}", e)))?;
        AppState::recover(value).map(Some)
    }

    fn save(&self, state: &AppState) -> Result<(), MilkError> {
        self.check_writable()?;

        let text = serde_json::to_string(state)
            .map_err(|e| MilkError::Persistence(format!("Failed to serialize data: {}", e)))?;

        let mut document = self
            .document
            .lock()
            .map_err(|e| MilkError::Persistence(format!("Failed to acquire lock: {}", e)))?;
        *document = Some(text);
        Ok(())
    }

    fn set_aside(&self) -> Result<Option<String>, MilkError> {
        self.check_writable()?;

        let Some(text) = self.document() else {
            return Ok(None);
        };
        let mut copies = self
            .set_aside
            .lock()
            .map_err(|e| MilkError::Persistence(format!("Failed to acquire lock: {}", e)))?;
        copies.push(text);
        Ok(Some(format!("in-memory copy {}", copies.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, NewEntry};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_state() -> AppState {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let entry = Entry::create(NewEntry::new(10.0, date).with_animals(2)).unwrap();
        AppState::with_entries(vec![entry])
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("state.json"));

        assert!(store.load().unwrap().is_none());

        let state = sample_state();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap().unwrap().state, state);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let state = sample_state();
        store.save(&state).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.is_complete());
        assert_eq!(loaded.state, state);
    }

    #[test]
    fn test_file_store_set_aside_copies_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("milk-tracker-data.json");
        let store = JsonFileStore::new(path.clone());

        assert!(store.set_aside().unwrap().is_none());

        fs::write(&path, "{ not json").unwrap();
        let copy = store.set_aside().unwrap().unwrap();
        assert!(copy.contains("milk-tracker-data.json.corrupt-"));
        assert_eq!(fs::read_to_string(&copy).unwrap(), "{ not json");
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_memory_store_set_aside() {
        let store = MemoryStore::with_document("{ not json");
        store.set_aside().unwrap();
        assert_eq!(store.set_aside_documents(), vec!["{ not json".to_string()]);

        store.set_fail_writes(true);
        assert!(store.set_aside().unwrap_err().is_persistence());
    }

    #[test]
    fn test_memory_store_write_failure() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(store.save(&sample_state()).unwrap_err().is_persistence());
        assert!(store.document().is_none());
    }

    #[test]
    fn test_memory_store_corrupt_document() {
        let store = MemoryStore::with_document("{ not json");
        assert!(store.load().unwrap_err().is_persistence());
    }
}
