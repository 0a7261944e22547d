//! CSV-backed submission storage
//!
//! Both the submission path and the admin view go through a [`TableFile`],
//! which owns the file path and the lock that serializes every
//! read-modify-write cycle on it. Clones share the same lock.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

use super::models::Record;
use super::table::{PositionOutOfRange, Table, TableParseError};
use crate::config::CorruptTablePolicy;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Existing table {} is unreadable: {source}", .path.display())]
    CorruptTable {
        path: PathBuf,
        #[source]
        source: TableParseError,
    },
    #[error("Failed to encode table: {0}")]
    Encode(#[from] csv::Error),
    #[error(transparent)]
    Position(#[from] PositionOutOfRange),
}

/// Result of a successful append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The record was added after the existing rows.
    Appended { total_rows: usize },
    /// The previous file could not be parsed and was replaced by a table
    /// holding only the new record. `quarantined` names where the old bytes
    /// were moved, if they were kept.
    RecoveredFromCorruption { quarantined: Option<PathBuf> },
}

/// Handle to the backing CSV file.
#[derive(Clone)]
pub struct TableFile {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl TableFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store handle for the submission path.
    pub fn submissions(&self, on_corrupt: CorruptTablePolicy) -> SubmissionStore {
        SubmissionStore {
            file: self.clone(),
            on_corrupt,
        }
    }

    /// Store handle for the admin path.
    pub fn admin_view(&self) -> AdminView {
        AdminView { file: self.clone() }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    /// Read and parse the whole file. `None` when it does not exist.
    fn read(&self) -> Result<Option<Table>, StoreError> {
        let bytes = match fs::read(self.path.as_path()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.to_path_buf(),
                    source,
                })
            }
        };

        Table::from_csv_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::CorruptTable {
                path: self.path.to_path_buf(),
                source,
            })
    }

    /// Replace the file with `table`.
    ///
    /// The bytes land in a temp file next to the target first, then get
    /// renamed over it, so readers never observe a partial table.
    fn write(&self, table: &Table) -> Result<(), StoreError> {
        let bytes = table.to_csv_bytes()?;
        let io_err = |source| StoreError::Io {
            path: self.path.to_path_buf(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(io_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(self.path.as_path()).map_err(|e| io_err(e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            rows = table.len(),
            "Rewrote submission table"
        );
        Ok(())
    }

    /// Move the unreadable file aside and return its new location.
    fn quarantine(&self) -> Result<PathBuf, StoreError> {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "table".to_string());
        let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");

        let mut target = self.path.with_file_name(format!("{stem}.corrupt-{stamp}.csv"));
        let mut n = 1;
        while target.exists() {
            target = self
                .path
                .with_file_name(format!("{stem}.corrupt-{stamp}-{n}.csv"));
            n += 1;
        }

        fs::rename(self.path.as_path(), &target).map_err(|source| StoreError::Io {
            path: self.path.to_path_buf(),
            source,
        })?;
        Ok(target)
    }

    /// Files previously moved aside by [`TableFile::quarantine`], sorted.
    fn quarantined_files(&self) -> Vec<PathBuf> {
        let Some(stem) = self.path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            return Vec::new();
        };
        let prefix = format!("{stem}.corrupt-");
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut found: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().starts_with(&prefix))
                    .unwrap_or(false)
            })
            .collect();
        found.sort();
        found
    }
}

impl std::fmt::Debug for TableFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableFile")
            .field("path", &self.path)
            .finish()
    }
}

/// Append-only write path for new submissions.
#[derive(Debug, Clone)]
pub struct SubmissionStore {
    file: TableFile,
    on_corrupt: CorruptTablePolicy,
}

impl SubmissionStore {
    /// Add `record` as the last row, creating the table if needed.
    pub fn append(&self, record: Record) -> Result<AppendOutcome, StoreError> {
        let _guard = self.file.lock();

        let mut table = match self.file.read() {
            Ok(existing) => existing.unwrap_or_default(),
            Err(StoreError::CorruptTable { path, source }) => {
                return self.recover_from_corruption(record, path, source);
            }
            Err(e) => return Err(e),
        };

        table.push(record);
        self.file.write(&table)?;

        Ok(AppendOutcome::Appended {
            total_rows: table.len(),
        })
    }

    fn recover_from_corruption(
        &self,
        record: Record,
        path: PathBuf,
        source: TableParseError,
    ) -> Result<AppendOutcome, StoreError> {
        let quarantined = match self.on_corrupt {
            CorruptTablePolicy::Refuse => {
                tracing::error!(
                    path = %path.display(),
                    error = %source,
                    "Refusing to append: existing submission table is unreadable"
                );
                return Err(StoreError::CorruptTable { path, source });
            }
            CorruptTablePolicy::Discard => {
                tracing::error!(
                    path = %path.display(),
                    error = %source,
                    "Existing submission table is unreadable; discarding its contents"
                );
                None
            }
            CorruptTablePolicy::Quarantine => {
                let moved = self.file.quarantine()?;
                tracing::error!(
                    path = %path.display(),
                    quarantined = %moved.display(),
                    error = %source,
                    "Existing submission table is unreadable; moved it aside"
                );
                Some(moved)
            }
        };

        self.file.write(&Table::new(vec![record]))?;
        Ok(AppendOutcome::RecoveredFromCorruption { quarantined })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Operator-facing read, delete and export over the table.
#[derive(Debug, Clone)]
pub struct AdminView {
    file: TableFile,
}

impl AdminView {
    /// Current table, or `None` when nothing has been submitted yet.
    pub fn load(&self) -> Result<Option<Table>, StoreError> {
        let _guard = self.file.lock();
        self.file.read()
    }

    /// Delete the rows at `positions` of `snapshot`, the table the operator
    /// last loaded, and persist the result.
    ///
    /// When the file still matches the snapshot the positions are removed
    /// directly. Otherwise the selected rows are removed from the current
    /// table by value, so submissions that arrived after the snapshot
    /// survive. The file is left untouched when nothing was removed.
    pub fn delete(
        &self,
        snapshot: &Table,
        positions: &BTreeSet<usize>,
    ) -> Result<Table, StoreError> {
        if positions.is_empty() {
            return Ok(snapshot.clone());
        }
        let targets = snapshot.select(positions)?;

        let _guard = self.file.lock();
        let Some(mut current) = self.file.read()? else {
            tracing::warn!(
                requested = targets.len(),
                "Submission table vanished before delete; nothing removed"
            );
            return Ok(Table::default());
        };

        let removed = if current == *snapshot {
            current = snapshot.without_positions(positions)?;
            targets.len()
        } else {
            current.remove_matching(&targets)
        };
        if removed < targets.len() {
            tracing::warn!(
                requested = targets.len(),
                removed,
                "Some selected rows were already gone from the table"
            );
        }
        if removed == 0 {
            return Ok(current);
        }

        self.file.write(&current)?;
        tracing::info!(removed, remaining = current.len(), "Deleted submissions");
        Ok(current)
    }

    /// Delete rows by their stable `record_id`. Unknown ids are ignored.
    pub fn delete_ids(&self, ids: &HashSet<Uuid>) -> Result<Table, StoreError> {
        let _guard = self.file.lock();
        let current = self.file.read()?.unwrap_or_default();
        if ids.is_empty() {
            return Ok(current);
        }

        let before = current.len();
        let kept = Table::new(
            current
                .into_rows()
                .into_iter()
                .filter(|row| !row.id().is_some_and(|id| ids.contains(&id)))
                .collect(),
        );
        let removed = before - kept.len();

        if removed > 0 {
            self.file.write(&kept)?;
        }
        tracing::info!(removed, remaining = kept.len(), "Deleted submissions by id");
        Ok(kept)
    }

    /// Whole table as CSV bytes for download. Header only when empty.
    pub fn export(&self) -> Result<Vec<u8>, StoreError> {
        let table = self.load()?.unwrap_or_default();
        Ok(table.to_csv_bytes()?)
    }

    /// Unreadable tables that were moved aside and still need an operator.
    pub fn quarantined_files(&self) -> Vec<PathBuf> {
        self.file.quarantined_files()
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
