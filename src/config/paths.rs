//! Path management for milk-ledger
//!
//! Provides XDG-compliant path resolution for the state file, backups and
//! the audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `MILK_LEDGER_DATA_DIR` environment variable / `--data-dir` flag
//! 2. Unix (Linux/macOS): `$XDG_DATA_HOME/milk-ledger` or `~/.local/share/milk-ledger`
//! 3. Windows: `%APPDATA%\milk-ledger`

use std::path::PathBuf;

use crate::error::MilkError;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MILK_LEDGER_DATA_DIR";

/// Name of the file holding the persisted `{entries, settings}` document
pub const STATE_FILE_NAME: &str = "milk-tracker-data.json";

/// Manages all paths used by milk-ledger
#[derive(Debug, Clone)]
pub struct MilkPaths {
    /// Base directory for all milk-ledger data
    base_dir: PathBuf,
}

impl MilkPaths {
    /// Create a new MilkPaths instance from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, MilkError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create MilkPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the backup directory (<base>/backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the persisted state document
    pub fn state_file(&self) -> PathBuf {
        self.base_dir.join(STATE_FILE_NAME)
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), MilkError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MilkError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| MilkError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if any state has been persisted yet
    pub fn is_initialized(&self) -> bool {
        self.state_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, MilkError> {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        if !xdg.trim().is_empty() {
            return Ok(PathBuf::from(xdg).join("milk-ledger"));
        }
    }

    let home = std::env::var("HOME")
        .map_err(|_| MilkError::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("milk-ledger"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, MilkError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| MilkError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("milk-ledger"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MilkPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
        assert_eq!(
            paths.state_file(),
            temp_dir.path().join("milk-tracker-data.json")
        );
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MilkPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
        assert!(paths.backup_dir().exists());
        assert!(!paths.is_initialized());
    }
}
