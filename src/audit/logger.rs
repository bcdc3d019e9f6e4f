//! Ledger change history
//!
//! Every mutation of the ledger appends one JSON line to `audit.log`. The
//! `history` command reads the tail of that file back.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{MilkError, MilkResult};

use super::entry::AuditEntry;

/// Append-only JSONL history of ledger changes
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one change record
    pub fn log(&self, entry: &AuditEntry) -> MilkResult<()> {
        let mut line = serde_json::to_vec(entry)
            .map_err(|e| MilkError::Json(format!("Failed to encode change record: {}", e)))?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                MilkError::Io(format!("Failed to open {}: {}", self.log_path.display(), e))
            })?;

        // Each record goes out as a single write
        file.write_all(&line)
            .and_then(|()| file.flush())
            .map_err(|e| MilkError::Io(format!("Failed to append change record: {}", e)))
    }

    /// Every change record, oldest first
    pub fn read_all(&self) -> MilkResult<Vec<AuditEntry>> {
        let mut records = Vec::new();
        self.scan(|record| records.push(record))?;
        Ok(records)
    }

    /// The last `count` change records, oldest first
    pub fn read_recent(&self, count: usize) -> MilkResult<Vec<AuditEntry>> {
        let mut tail = VecDeque::with_capacity(count.min(256));
        if count > 0 {
            self.scan(|record| {
                if tail.len() == count {
                    tail.pop_front();
                }
                tail.push_back(record);
            })?;
        }
        Ok(tail.into())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Feed each readable record to `visit`; lines that do not parse are
    /// skipped with a warning
    fn scan(&self, mut visit: impl FnMut(AuditEntry)) -> MilkResult<()> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(MilkError::Io(format!(
                    "Failed to open {}: {}",
                    self.log_path.display(),
                    e
                )))
            }
        };

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .map_err(|e| MilkError::Io(format!("Failed to read change history: {}", e)))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => visit(record),
                Err(e) => warn!(line = index + 1, error = %e, "Skipping unreadable history line"),
            }
        }
        Ok(())
    }
}
