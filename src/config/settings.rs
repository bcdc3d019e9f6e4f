//! User settings for milk-ledger
//!
//! Settings are persisted inside the same document as the entries. Every
//! field carries a serde default, so keys missing from an older document
//! pick up their defaults without clobbering the keys that are present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MilkError, MilkResult};

/// Process-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Price per kilogram of milk
    #[serde(default)]
    pub milk_price: f64,

    /// Set once a (simulated) cloud backup has succeeded
    #[serde(default)]
    pub cloud_backup_enabled: bool,

    /// Timestamp of the last successful cloud backup
    #[serde(default)]
    pub last_backup_date: Option<DateTime<Utc>>,

    /// Currency symbol used for revenue figures
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Number of entries shown by the recent-entries list
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Number of local backup files kept when pruning
    #[serde(default = "default_backup_keep")]
    pub backup_keep: u32,
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_recent_limit() -> usize {
    10
}

fn default_backup_keep() -> u32 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            milk_price: 0.0,
            cloud_backup_enabled: false,
            last_backup_date: None,
            currency_symbol: default_currency(),
            recent_limit: default_recent_limit(),
            backup_keep: default_backup_keep(),
        }
    }
}

impl Settings {
    /// Shallow-merge a JSON object over these settings.
    ///
    /// Keys present in `overrides` replace the current values; every other
    /// key keeps its current value. Anything that is not a JSON object
    /// (including `null`) leaves the settings unchanged.
    pub fn merged_with(&self, overrides: &Value) -> MilkResult<Settings> {
        let Value::Object(overrides) = overrides else {
            return Ok(self.clone());
        };

        let mut base = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => return Err(MilkError::Config("Settings did not serialize to an object".into())),
        };

        for (key, value) in overrides {
            base.insert(key.clone(), value.clone());
        }

        let merged: Settings = serde_json::from_value(Value::Object(base))
            .map_err(|e| MilkError::Config(format!("Invalid settings value: {}", e)))?;
        merged.validate()?;
        Ok(merged)
    }

    /// Build settings from a stored block one key at a time
    ///
    /// Keys that fail to parse or validate keep their default and are
    /// reported in the returned list. A block that is not an object yields
    /// the defaults.
    pub fn recover(stored: &Value) -> (Settings, Vec<String>) {
        let mut settings = Settings::default();
        let mut skipped = Vec::new();

        if let Value::Object(map) = stored {
            for (key, value) in map {
                let single = Value::Object([(key.clone(), value.clone())].into_iter().collect());
                match settings.merged_with(&single) {
                    Ok(merged) => settings = merged,
                    Err(e) => skipped.push(format!("setting '{}': {}", key, e)),
                }
            }
        }

        (settings, skipped)
    }

    /// Check that numeric settings are usable
    pub fn validate(&self) -> MilkResult<()> {
        if !self.milk_price.is_finite() || self.milk_price < 0.0 {
            return Err(MilkError::Config(format!(
                "Milk price must be a non-negative number, got {}",
                self.milk_price
            )));
        }
        Ok(())
    }

    /// Record a successful cloud backup
    pub fn mark_cloud_backup(&mut self, at: DateTime<Utc>) {
        self.cloud_backup_enabled = true;
        self.last_backup_date = Some(at);
    }
}
