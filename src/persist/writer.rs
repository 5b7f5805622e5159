//! Backup-then-write persistence
//!
//! One save:
//! 1. Refuse if there is no document skeleton
//! 2. Copy the current file to the backup path (failure is non-fatal)
//! 3. Canonicalize the store to rank order and encode it
//! 4. Write `<target>.tmp`, fsync, rename over the target
//!
//! The rename makes the write a whole-file replacement: a failed save
//! leaves the previous document untouched.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::checksum::compute_checksum;
use super::errors::{SaveError, SaveResult};
use crate::codec::{DocumentCodec, DocumentSkeleton};
use crate::observability::{Event, Logger};
use crate::store::RowStore;

/// What happened to the backup copy during a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// No previous document existed
    Skipped,
    /// Previous document copied to the backup path
    Copied { bytes: u64 },
    /// Copy failed; the save went ahead anyway
    Failed { reason: String },
}

/// Summary of a completed save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// File that was written
    pub path: PathBuf,
    /// Rows written
    pub row_count: usize,
    /// Document size in bytes
    pub bytes: usize,
    /// CRC32 of the document bytes
    pub checksum: u32,
    /// Backup result
    pub backup: BackupOutcome,
    /// Whether the rename was made durable with a directory fsync
    pub directory_synced: bool,
    /// Completion time
    pub saved_at: DateTime<Utc>,
}

/// Writes the row store to the document file.
#[derive(Debug, Clone)]
pub struct DocumentPersister {
    target: PathBuf,
    backup: PathBuf,
    temp: PathBuf,
    skeleton: Option<DocumentSkeleton>,
}

impl DocumentPersister {
    /// Creates a persister with no skeleton; saves fail with
    /// `SaveError::NoDocument` until one is installed.
    pub fn new(target: impl Into<PathBuf>, backup: impl Into<PathBuf>) -> Self {
        let target = target.into();
        let temp = temp_path_for(&target);
        Self {
            target,
            backup: backup.into(),
            temp,
            skeleton: None,
        }
    }

    /// Creates a persister that renders into `skeleton`.
    pub fn with_skeleton(
        target: impl Into<PathBuf>,
        backup: impl Into<PathBuf>,
        skeleton: DocumentSkeleton,
    ) -> Self {
        let mut persister = Self::new(target, backup);
        persister.skeleton = Some(skeleton);
        persister
    }

    /// Replaces the skeleton used by subsequent saves.
    pub fn install_skeleton(&mut self, skeleton: DocumentSkeleton) {
        self.skeleton = Some(skeleton);
    }

    pub fn target_path(&self) -> &Path {
        &self.target
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Runs one full save of `store`.
    ///
    /// On success the store is left in ascending rank order.
    ///
    /// # Errors
    ///
    /// - `SaveError::NoDocument` if no skeleton is installed; nothing is
    ///   copied or written
    /// - `SaveError::WriteFailed` if the new document could not be written;
    ///   the previous file (and its fresh backup) remain in place
    pub fn perform_save(&self, store: &mut RowStore) -> SaveResult<SaveReport> {
        let skeleton = self.skeleton.as_ref().ok_or(SaveError::NoDocument)?;

        let backup = self.backup_existing();

        store.canonicalize();
        let document = DocumentCodec::encode(skeleton, store.rows());
        let bytes = document.as_bytes();

        let directory_synced = self.write_atomic(bytes)?;

        Ok(SaveReport {
            path: self.target.clone(),
            row_count: store.len(),
            bytes: bytes.len(),
            checksum: compute_checksum(bytes),
            backup,
            directory_synced,
            saved_at: Utc::now(),
        })
    }

    /// Copies the current target to the backup path, overwriting any
    /// previous backup.
    fn backup_existing(&self) -> BackupOutcome {
        if !self.target.exists() {
            return BackupOutcome::Skipped;
        }
        match fs::copy(&self.target, &self.backup) {
            Ok(bytes) => BackupOutcome::Copied { bytes },
            Err(e) => BackupOutcome::Failed {
                reason: format!("could not copy to {}: {}", self.backup.display(), e),
            },
        }
    }

    /// Write to temp file, fsync, rename over target, fsync the directory.
    ///
    /// Returns whether the directory fsync succeeded. Once the rename has
    /// happened the new document is in place, so a directory fsync failure
    /// is logged and reported rather than failing the save.
    fn write_atomic(&self, content: &[u8]) -> SaveResult<bool> {
        let dir = parent_dir(&self.target);
        fs::create_dir_all(dir)
            .map_err(|e| SaveError::write_failed(&self.target, "failed to create directory", &e))?;

        let result = self.write_temp(content).and_then(|()| {
            fs::rename(&self.temp, &self.target).map_err(|e| {
                SaveError::write_failed(&self.target, "failed to replace document", &e)
            })
        });

        if let Err(e) = result {
            let _ = fs::remove_file(&self.temp);
            return Err(e);
        }

        match File::open(dir).and_then(|handle| handle.sync_all()) {
            Ok(()) => Ok(true),
            Err(e) => {
                let reason = e.to_string();
                Logger::warn(
                    Event::SaveDirSyncFailed,
                    &[
                        ("directory", dir.display().to_string().as_str()),
                        ("reason", reason.as_str()),
                    ],
                );
                Ok(false)
            }
        }
    }

    fn write_temp(&self, content: &[u8]) -> SaveResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp)
            .map_err(|e| SaveError::write_failed(&self.target, "failed to create temp file", &e))?;

        file.write_all(content)
            .map_err(|e| SaveError::write_failed(&self.target, "failed to write document", &e))?;

        file.sync_all()
            .map_err(|e| SaveError::write_failed(&self.target, "failed to fsync document", &e))?;

        Ok(())
    }
}

/// Directory holding `target`; a bare file name lives in `.`.
fn parent_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// `<target>.tmp`, next to the target so the rename stays on one filesystem.
fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}
