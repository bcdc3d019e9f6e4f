//! Session controller
//!
//! A [`Session`] owns the application state for one run: the entry store,
//! the settings, the persistence backend and (optionally) the audit log.
//! Every mutation takes `&mut self` and saves before returning, so a change
//! and its persistence form one unit.
//!
//! A failed save never discards the in-memory change; it is reported through
//! [`Persisted::save_error`] and the in-memory state remains authoritative
//! for the rest of the session.
//!
//! When the stored document could not be read in full, the first save copies
//! it aside through [`StateStore::set_aside`]. If that copy fails, nothing is
//! written over the original.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{info, warn};

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::backup::{codec, CloudBackup, RestorePayload};
use crate::config::settings::Settings;
use crate::error::{MilkError, MilkResult};
use crate::models::{AppState, Entry, EntryId, Granularity, LoadedState, NewEntry};
use crate::reports::{ProductionReport, ReportOutcome};
use crate::storage::StateStore;

use super::aggregate::{self, Financials};
use super::entries::EntryStore;

/// Answer to a request to perform a destructive operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// `Confirmed` when the user forced the operation
    pub fn from_force(force: bool) -> Self {
        if force {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }

    pub fn is_confirmed(self) -> bool {
        self == Self::Confirmed
    }
}

/// Outcome of a mutation together with the result of saving it
#[derive(Debug)]
pub struct Persisted<T> {
    /// Result of the mutation; already applied in memory
    pub value: T,
    /// Set when the state could not be written to storage
    pub save_error: Option<MilkError>,
}

impl<T> Persisted<T> {
    /// Whether the change reached durable storage
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none()
    }

    /// Treat a save failure as an error
    pub fn into_result(self) -> MilkResult<T> {
        match self.save_error {
            None => Ok(self.value),
            Some(err) => Err(err),
        }
    }
}

/// The state of one run plus its persistence backend
pub struct Session<S: StateStore> {
    backend: S,
    entries: EntryStore,
    settings: Settings,
    audit: Option<AuditLogger>,
    load_error: Option<MilkError>,
    skipped: Vec<String>,
    unread_original: bool,
    set_aside_location: Option<String>,
}

impl<S: StateStore> Session<S> {
    /// Load state from the backend
    ///
    /// A document that cannot be read or parsed leaves the session empty;
    /// the failure is available from [`Session::load_error`]. Unreadable rows
    /// of an otherwise readable document are dropped and listed by
    /// [`Session::skipped_on_load`].
    pub fn open(backend: S) -> Self {
        let (loaded, load_error) = match backend.load() {
            Ok(Some(loaded)) => (loaded, None),
            Ok(None) => (LoadedState::default(), None),
            Err(e) => {
                warn!(error = %e, "Failed to load saved data, starting empty");
                (LoadedState::default(), Some(e))
            }
        };

        for problem in &loaded.skipped {
            warn!(problem = %problem, "Skipped unreadable stored data");
        }

        let unread_original = load_error.is_some() || !loaded.is_complete();
        let LoadedState { state, skipped } = loaded;
        info!(entries = state.entries.len(), skipped = skipped.len(), "Session opened");

        Self {
            backend,
            entries: EntryStore::from_entries(state.entries),
            settings: state.settings,
            audit: None,
            load_error,
            skipped,
            unread_original,
            set_aside_location: None,
        }
    }

    /// Record mutations in the given audit log
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Error encountered while loading, if any
    pub fn load_error(&self) -> Option<&MilkError> {
        self.load_error.as_ref()
    }

    /// Stored entries and settings that could not be read
    pub fn skipped_on_load(&self) -> &[String] {
        &self.skipped
    }

    /// Where the unreadable original was copied before being overwritten
    pub fn set_aside_location(&self) -> Option<&str> {
        self.set_aside_location.as_deref()
    }

    /// The persistence backend
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[Entry] {
        self.entries.entries()
    }

    /// The configured number of most recent entries
    pub fn recent_entries(&self) -> &[Entry] {
        self.entries.recent(self.settings.recent_limit)
    }

    /// Resolve a user-supplied entry identifier
    pub fn find_entry(&self, identifier: &str) -> MilkResult<&Entry> {
        self.entries
            .find(identifier)?
            .ok_or_else(|| MilkError::entry_not_found(identifier))
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Copy of the full state
    pub fn snapshot(&self) -> AppState {
        AppState {
            entries: self.entries.entries().to_vec(),
            settings: self.settings.clone(),
        }
    }

    /// Sum of all recorded milk
    pub fn total_quantity(&self) -> f64 {
        aggregate::total_quantity(self.entries.entries())
    }

    /// Financial metrics at the current milk price
    pub fn financials(&self) -> Financials {
        aggregate::financials(self.entries.entries(), self.settings.milk_price)
    }

    /// Build a production report
    ///
    /// With `chronological` the entries are sorted oldest first before
    /// grouping; otherwise rows follow stored (newest first) order.
    pub fn generate_report(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        granularity: Granularity,
        chronological: bool,
    ) -> MilkResult<ReportOutcome> {
        if chronological {
            let mut sorted = self.entries.entries().to_vec();
            sorted.sort_by_key(|e| e.date);
            ProductionReport::generate(&sorted, start, end, granularity)
        } else {
            ProductionReport::generate(self.entries.entries(), start, end, granularity)
        }
    }

    /// Encode the full state as a backup document
    pub fn backup_document(&self) -> MilkResult<String> {
        codec::serialize(&self.snapshot())
    }

    /// Validate and record a new entry
    ///
    /// Validation failures leave the state unchanged.
    pub fn add_entry(&mut self, new: NewEntry) -> MilkResult<Persisted<Entry>> {
        let entry = match self.entries.add(new) {
            Ok(entry) => entry.clone(),
            Err(e) => {
                warn!(error = %e, "Rejected entry");
                return Err(e);
            }
        };

        info!(id = %entry.id, quantity = entry.quantity, "Added entry");
        self.audit(AuditEntry::create(
            EntityType::Entry,
            entry.id.to_string(),
            Some(format!("{:.1} kg", entry.quantity)),
            &entry,
        ));

        Ok(self.persist(entry))
    }

    /// Remove an entry by id; absent ids are a no-op that still saves
    pub fn remove_entry(&mut self, id: EntryId) -> Persisted<Option<Entry>> {
        let removed = self.entries.remove(id);

        if let Some(entry) = &removed {
            info!(id = %entry.id, "Deleted entry");
            self.audit(AuditEntry::delete(
                EntityType::Entry,
                entry.id.to_string(),
                Some(format!("{:.1} kg", entry.quantity)),
                entry,
            ));
        }

        self.persist(removed)
    }

    /// Delete the entry matching `identifier` after confirmation
    ///
    /// Returns `None` when declined. Unknown identifiers are an error.
    pub fn delete_entry(
        &mut self,
        identifier: &str,
        confirmation: Confirmation,
    ) -> MilkResult<Option<Persisted<Entry>>> {
        let id = self.find_entry(identifier)?.id;

        if !confirmation.is_confirmed() {
            return Ok(None);
        }

        let result = self.remove_entry(id);
        match result.value {
            Some(entry) => Ok(Some(Persisted {
                value: entry,
                save_error: result.save_error,
            })),
            None => Err(MilkError::entry_not_found(identifier)),
        }
    }

    /// Remove every entry after confirmation, returning how many were removed
    pub fn clear_entries(&mut self, confirmation: Confirmation) -> Option<Persisted<usize>> {
        if !confirmation.is_confirmed() {
            return None;
        }

        let removed = self.entries.clear();
        info!(removed, "Cleared all entries");
        self.audit(AuditEntry::clear(removed));

        Some(self.persist(removed))
    }

    /// Set the price per kilogram
    pub fn set_milk_price(&mut self, price: f64) -> MilkResult<Persisted<f64>> {
        if !price.is_finite() || price <= 0.0 {
            warn!(price, "Rejected milk price");
            return Err(MilkError::Validation(format!(
                "Milk price must be greater than zero, got {}",
                price
            )));
        }

        let before = self.settings.clone();
        self.settings.milk_price = price;
        info!(price, "Updated milk price");
        self.audit_settings(&before);

        Ok(self.persist(price))
    }

    /// Replace all entries with a backup's and merge its settings
    ///
    /// The payload is checked before anything changes; a settings block
    /// that cannot be merged fails with a backup format error. Returns
    /// `None` when declined, otherwise the number of restored entries.
    pub fn restore(
        &mut self,
        payload: RestorePayload,
        confirmation: Confirmation,
    ) -> MilkResult<Option<Persisted<usize>>> {
        let merged = self
            .settings
            .merged_with(&payload.settings)
            .map_err(|e| MilkError::BackupFormat(format!("Backup settings are invalid: {}", e)))?;

        if !confirmation.is_confirmed() {
            return Ok(None);
        }

        let before_settings = serde_json::to_value(&self.settings).ok();
        let restored = payload.entries.len();
        let replaced = self.entries.replace_all(payload.entries).len();
        self.settings = merged;

        let diff = match (before_settings, serde_json::to_value(&self.settings).ok()) {
            (Some(before), Some(after)) => generate_diff(&before, &after),
            _ => None,
        };

        info!(replaced, restored, "Restored from backup");
        self.audit(AuditEntry::restore(replaced, restored, diff));

        Ok(Some(self.persist(restored)))
    }

    /// Run a simulated cloud backup and record its completion in settings
    pub fn cloud_backup(&mut self, cloud: &CloudBackup) -> MilkResult<Persisted<DateTime<Utc>>> {
        let finished = cloud.upload(&self.snapshot())?;

        let before = self.settings.clone();
        self.settings.mark_cloud_backup(finished);
        info!(at = %finished, "Cloud backup completed");
        self.audit_settings(&before);

        Ok(self.persist(finished))
    }

    fn persist<T>(&mut self, value: T) -> Persisted<T> {
        let saved = self
            .preserve_original()
            .and_then(|()| self.backend.save(&self.snapshot()));
        let save_error = match saved {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "Failed to save data; changes are kept in memory only");
                Some(e)
            }
        };
        Persisted { value, save_error }
    }

    /// Copy an unreadable stored document aside before its first overwrite
    fn preserve_original(&mut self) -> MilkResult<()> {
        if !self.unread_original {
            return Ok(());
        }

        let location = self.backend.set_aside().map_err(|e| {
            MilkError::Persistence(format!(
                "Refusing to overwrite stored data that could not be read: {}",
                e
            ))
        })?;

        if let Some(location) = &location {
            info!(location = %location, "Copied unreadable stored data aside");
        }
        self.set_aside_location = location;
        self.unread_original = false;
        Ok(())
    }

    fn audit_settings(&self, before: &Settings) {
        let diff = match (
            serde_json::to_value(before),
            serde_json::to_value(&self.settings),
        ) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit(AuditEntry::update(
            EntityType::Settings,
            "settings",
            before,
            &self.settings,
            diff,
        ));
    }

    fn audit(&self, entry: AuditEntry) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log(&entry) {
                warn!(error = %e, "Failed to write audit log");
            }
        }
    }
}
