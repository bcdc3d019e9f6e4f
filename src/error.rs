//! Custom error types for milk-ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. None of these errors is fatal: every
//! failure path hands control back to the caller with the in-memory state
//! unchanged (or explicitly rolled back).

use chrono::NaiveDateTime;
use thiserror::Error;

/// The main error type for milk-ledger operations
#[derive(Error, Debug)]
pub enum MilkError {
    /// User-correctable input problems (quantity, price, date, animal count)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Durable storage could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A restore payload is malformed or structurally invalid
    #[error("Invalid backup format: {0}")]
    BackupFormat(String),

    /// Report range where the start lies after the end
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl MilkError {
    /// Create a "not found" error for entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Check if this is a backup format error
    pub fn is_backup_format(&self) -> bool {
        matches!(self, Self::BackupFormat(_))
    }

    /// Check if this is an invalid range error
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, Self::InvalidRange { .. })
    }
}

impl From<std::io::Error> for MilkError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MilkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for milk-ledger operations
pub type MilkResult<T> = Result<T, MilkError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_error_display() {
        let err = MilkError::Validation("quantity must be positive".into());
        assert_eq!(err.to_string(), "Validation error: quantity must be positive");
        assert!(err.is_validation());
    }

    #[test]
    fn test_not_found_error() {
        let err = MilkError::entry_not_found("ent-1234abcd");
        assert_eq!(err.to_string(), "Entry not found: ent-1234abcd");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_range_display() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let err = MilkError::InvalidRange { start, end };
        assert!(err.is_invalid_range());
        assert_eq!(
            err.to_string(),
            "Invalid date range: start 2024-03-01 00:00:00 is after end 2024-02-01 23:59:59"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let milk_err: MilkError = io_err.into();
        assert!(matches!(milk_err, MilkError::Io(_)));
    }
}
