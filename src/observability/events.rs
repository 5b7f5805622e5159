//! Observable editor events
//!
//! Events are explicit and typed; every log line names one.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Editor session opened
    EditorOpen,
    /// Editor shut down
    EditorShutdown,
    /// Configuration loaded
    ConfigLoaded,

    // Document load
    /// Document decoded into rows
    DocumentLoaded,
    /// Document missing or malformed; empty skeleton substituted
    DocumentFallback,
    /// A row was skipped or repaired during load
    LoadRowSkipped,

    // Row intents
    /// Row added
    RowAdded,
    /// Row status updated
    RowUpdated,
    /// Row deleted
    RowDeleted,
    /// All rows cleared
    RowsCleared,
    /// Intent rejected by validation
    IntentRejected,
    /// Rows re-sorted for display
    RowsSorted,

    // Persistence
    /// Save timer armed (or re-armed)
    SaveScheduled,
    /// Pending save dropped
    SaveCancelled,
    /// Backup copy written
    BackupComplete,
    /// Backup copy failed; save continues
    BackupFailed,
    /// Document written
    SaveComplete,
    /// Document write failed
    SaveFailed,
    /// Document replaced but its directory could not be fsynced
    SaveDirSyncFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::EditorOpen => "EDITOR_OPEN",
            Event::EditorShutdown => "EDITOR_SHUTDOWN",
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::DocumentLoaded => "DOCUMENT_LOADED",
            Event::DocumentFallback => "DOCUMENT_FALLBACK",
            Event::LoadRowSkipped => "LOAD_ROW_SKIPPED",

            Event::RowAdded => "ROW_ADDED",
            Event::RowUpdated => "ROW_UPDATED",
            Event::RowDeleted => "ROW_DELETED",
            Event::RowsCleared => "ROWS_CLEARED",
            Event::IntentRejected => "INTENT_REJECTED",
            Event::RowsSorted => "ROWS_SORTED",

            Event::SaveScheduled => "SAVE_SCHEDULED",
            Event::SaveCancelled => "SAVE_CANCELLED",
            Event::BackupComplete => "BACKUP_COMPLETE",
            Event::BackupFailed => "BACKUP_FAILED",
            Event::SaveComplete => "SAVE_COMPLETE",
            Event::SaveFailed => "SAVE_FAILED",
            Event::SaveDirSyncFailed => "SAVE_DIR_SYNC_FAILED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
