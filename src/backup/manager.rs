//! Local backup files
//!
//! Backups are written to the backup directory as dated JSON documents and
//! pruned by keeping the newest N.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::config::paths::MilkPaths;
use crate::error::{MilkError, MilkResult};
use crate::models::AppState;

use super::codec::{self, RestorePayload};

const FILE_PREFIX: &str = "milk-tracker-backup-";

/// Metadata about a backup
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    /// Create a manager for the data directory's backup folder
    pub fn new(paths: &MilkPaths) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
        }
    }

    /// Write a backup of the given state
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self, state: &AppState) -> MilkResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| MilkError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let filename = format!(
            "{}{}-{:03}.json",
            FILE_PREFIX,
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let json = codec::serialize(state)?;
        fs::write(&backup_path, json)
            .map_err(|e| MilkError::Io(format!("Failed to write backup file: {}", e)))?;

        tracing::info!(path = %backup_path.display(), entries = state.entries.len(), "Created backup");
        Ok(backup_path)
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> MilkResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| MilkError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| MilkError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    /// Delete all but the `keep` newest backups
    pub fn enforce_retention(&self, keep: usize) -> MilkResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for backup in self.list_backups()?.into_iter().skip(keep) {
            fs::remove_file(&backup.path)
                .map_err(|e| MilkError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }

        if !deleted.is_empty() {
            tracing::info!(deleted = deleted.len(), keep, "Pruned old backups");
        }
        Ok(deleted)
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Get a specific backup by filename
    pub fn get_backup(&self, filename: &str) -> Option<BackupInfo> {
        let path = self.backup_dir.join(filename);
        if path.exists() {
            parse_backup_info(&path)
        } else {
            None
        }
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self) -> MilkResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Resolve `latest`, a filename in the backup directory, or a path
    pub fn resolve(&self, identifier: &str) -> MilkResult<PathBuf> {
        if identifier.eq_ignore_ascii_case("latest") {
            return self
                .get_latest_backup()?
                .map(|info| info.path)
                .ok_or_else(|| MilkError::backup_not_found("latest"));
        }

        let direct = PathBuf::from(identifier);
        if direct.is_file() {
            return Ok(direct);
        }

        let in_dir = self.backup_dir.join(identifier);
        if in_dir.is_file() {
            return Ok(in_dir);
        }

        Err(MilkError::backup_not_found(identifier))
    }

    /// Read and validate a backup file
    pub fn read_payload(&self, path: &Path) -> MilkResult<RestorePayload> {
        let contents = fs::read_to_string(path)
            .map_err(|e| MilkError::Io(format!("Failed to read backup file: {}", e)))?;
        codec::deserialize(&contents)
    }
}

/// Parse backup info from a backup file, skipping foreign files
fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();

    let date_part = filename.strip_prefix(FILE_PREFIX)?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;

    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS` or `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = if parts.len() == 3 {
        parts[2].parse().ok()?
    } else {
        0
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part.get(0..4)?.parse().ok()?;
    let month: u32 = date_part.get(4..6)?.parse().ok()?;
    let day: u32 = date_part.get(6..8)?.parse().ok()?;
    let hour: u32 = time_part.get(0..2)?.parse().ok()?;
    let minute: u32 = time_part.get(2..4)?.parse().ok()?;
    let second: u32 = time_part.get(4..6)?.parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;

    Some(DateTime::from_naive_utc_and_offset(
        chrono::NaiveDateTime::new(date, time),
        Utc,
    ))
}
