//! Milk entry model
//!
//! One recorded milk-quantity measurement. Entries are immutable after
//! creation; the only way to change one is to delete it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ids::EntryId;
use super::input::parse_stored_timestamp;
use crate::error::{MilkError, MilkResult};

/// A measurement waiting to be accepted into the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    /// Kilograms of milk
    pub quantity: f64,
    /// When the milk was measured (local wall-clock time)
    pub date: NaiveDateTime,
    /// Number of animals contributing to the measurement
    pub animal_count: u32,
}

impl NewEntry {
    /// Create a new entry request for a single animal
    pub fn new(quantity: f64, date: NaiveDateTime) -> Self {
        Self {
            quantity,
            date,
            animal_count: 1,
        }
    }

    /// Set the number of contributing animals
    pub fn with_animals(mut self, animal_count: u32) -> Self {
        self.animal_count = animal_count;
        self
    }

    /// Validate the request
    pub fn validate(&self) -> MilkResult<()> {
        validate_fields(self.quantity, self.animal_count)
    }
}

/// A recorded measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredEntry")]
pub struct Entry {
    /// Unique identifier
    pub id: EntryId,

    /// Kilograms of milk
    pub quantity: f64,

    /// When the milk was measured (local wall-clock time)
    #[serde(serialize_with = "serialize_timestamp")]
    pub date: NaiveDateTime,

    /// Number of animals contributing to the measurement
    pub animal_count: u32,

    /// `quantity / animal_count`, fixed at creation
    pub per_animal: f64,
}

impl Entry {
    /// Accept a validated request, assigning a fresh id
    pub fn create(new: NewEntry) -> MilkResult<Self> {
        new.validate()?;
        Ok(Self {
            id: EntryId::new(),
            quantity: new.quantity,
            date: new.date,
            animal_count: new.animal_count,
            per_animal: new.quantity / new.animal_count as f64,
        })
    }

    /// Calendar day of the measurement
    pub fn day(&self) -> chrono::NaiveDate {
        self.date.date()
    }
}

fn validate_fields(quantity: f64, animal_count: u32) -> MilkResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(MilkError::Validation(format!(
            "Milk quantity must be greater than zero, got {}",
            quantity
        )));
    }
    if animal_count < 1 {
        return Err(MilkError::Validation(
            "Animal count must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Timestamps are written without an offset, e.g. `2024-01-01T06:30:00`
fn serialize_timestamp<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&date.format("%Y-%m-%dT%H:%M:%S%.f"))
}

/// Lenient on-disk shape of an entry
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    id: EntryId,
    quantity: f64,
    date: String,
    #[serde(default)]
    animal_count: Option<u32>,
    #[serde(default)]
    per_animal: Option<f64>,
}

impl TryFrom<StoredEntry> for Entry {
    type Error = MilkError;

    fn try_from(stored: StoredEntry) -> Result<Self, Self::Error> {
        let animal_count = stored.animal_count.unwrap_or(1);
        validate_fields(stored.quantity, animal_count)?;
        let date = parse_stored_timestamp(&stored.date)?;

        Ok(Self {
            id: stored.id,
            quantity: stored.quantity,
            date,
            animal_count,
            per_animal: stored
                .per_animal
                .unwrap_or(stored.quantity / animal_count as f64),
        })
    }
}
