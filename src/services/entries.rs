//! Entry store
//!
//! The authoritative in-memory list of entries for a session, newest first.
//! Persistence is driven by the owning [`Session`](super::Session) so that a
//! mutation and its save always happen together.

use crate::error::{MilkError, MilkResult};
use crate::models::{Entry, EntryId, NewEntry};

/// Ordered list of entries, most recent first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryStore {
    entries: Vec<Entry>,
}

impl EntryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an already-ordered list
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Validate a request, assign it a unique id and insert it at the front
    pub fn add(&mut self, new: NewEntry) -> MilkResult<&Entry> {
        let mut entry = Entry::create(new)?;
        while self.get(entry.id).is_some() {
            entry.id = EntryId::new();
        }

        self.entries.insert(0, entry);
        Ok(&self.entries[0])
    }

    /// Remove the entry with the given id; absent ids are ignored
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let position = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(position))
    }

    /// Remove every entry, returning how many were dropped
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Replace the whole list
    pub fn replace_all(&mut self, entries: Vec<Entry>) -> Vec<Entry> {
        std::mem::replace(&mut self.entries, entries)
    }

    /// Get an entry by id
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Resolve a user-supplied identifier (full id, `ent-xxxxxxxx`, or prefix)
    ///
    /// Fails when the identifier is ambiguous.
    pub fn find(&self, identifier: &str) -> MilkResult<Option<&Entry>> {
        let mut matches = self.entries.iter().filter(|e| e.id.matches(identifier));
        let first = matches.next();
        if first.is_some() && matches.next().is_some() {
            return Err(MilkError::Validation(format!(
                "Entry id '{}' is ambiguous; use more characters",
                identifier
            )));
        }
        Ok(first)
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The `limit` most recent entries
    pub fn recent(&self, limit: usize) -> &[Entry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
