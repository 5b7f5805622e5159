//! Standings editor state
//!
//! `StandingsEditor` is the single owner of everything mutable: the row
//! store, the edit buffer, the selection, the remembered sort and the save
//! timer. Presentation code sends intents in and drains notifications out;
//! it never touches the store directly.
//!
//! Every successful mutation:
//! 1. re-applies the remembered sort
//! 2. queues `RowsChanged`
//! 3. re-arms the save timer
//!
//! A rejected intent changes nothing and arms nothing.

use std::collections::VecDeque;
use std::path::Path;

use tokio::time::Instant;

use super::config::EditorConfig;
use super::notification::{Notice, Notification};
use crate::codec::{DocumentCodec, DocumentSkeleton};
use crate::observability::{Event, Logger, Severity};
use crate::persist::{BackupOutcome, DocumentPersister, SaveReport, SaveResult, SaveScheduler};
use crate::sort::{SortColumn, SortDirection, SortResult, SortState};
use crate::standings::{DisplayRow, Row, Status};
use crate::store::{EditBuffer, RowStore, ValidationError, ValidationResult};

/// Application state for one open document
#[derive(Debug)]
pub struct StandingsEditor {
    store: RowStore,
    buffer: EditBuffer,
    selection: Option<i64>,
    sort_state: SortState,
    scheduler: SaveScheduler,
    persister: DocumentPersister,
    notifications: VecDeque<Notification>,
    last_save: Option<SaveReport>,
}

impl StandingsEditor {
    /// Opens the document named by `config`.
    ///
    /// Never fails: a missing or malformed document is reported through a
    /// notification and replaced by an empty one, which the first save
    /// creates.
    pub fn open(config: &EditorConfig) -> Self {
        let persister = DocumentPersister::new(&config.document_path, config.backup_path());
        let scheduler = SaveScheduler::new(config.idle_delay());

        let mut editor = Self::new(persister, scheduler, config.sort_state());
        editor.load();
        editor
    }

    /// Builds an editor with an empty store and no document loaded.
    pub fn new(persister: DocumentPersister, scheduler: SaveScheduler, sort_state: SortState) -> Self {
        Self {
            store: RowStore::new(),
            buffer: EditBuffer::new(),
            selection: None,
            sort_state,
            scheduler,
            persister,
            notifications: VecDeque::new(),
            last_save: None,
        }
    }

    fn load(&mut self) {
        let path = self.persister.target_path().display().to_string();
        let delay_ms = self.scheduler.idle_delay().as_millis().to_string();
        Logger::info(
            Event::EditorOpen,
            &[("path", path.as_str()), ("autosave_delay_ms", delay_ms.as_str())],
        );

        match DocumentCodec::read_file(self.persister.target_path()) {
            Ok(decoded) => {
                for warning in decoded.warnings {
                    let row = warning.row().to_string();
                    let reason = warning.to_string();
                    Logger::warn(
                        Event::LoadRowSkipped,
                        &[
                            ("code", warning.code()),
                            ("row", row.as_str()),
                            ("reason", reason.as_str()),
                        ],
                    );
                    self.notifications.push_back(Notification::LoadWarning(warning));
                }

                for row in decoded.rows {
                    if let Err(e) = self.store.insert(row) {
                        let reason = e.to_string();
                        Logger::warn(
                            Event::LoadRowSkipped,
                            &[("code", e.code()), ("reason", reason.as_str())],
                        );
                    }
                }
                self.persister.install_skeleton(decoded.skeleton);

                let rows = self.store.len().to_string();
                Logger::info(
                    Event::DocumentLoaded,
                    &[("path", path.as_str()), ("rows", rows.as_str())],
                );
                self.notice(Severity::Info, "Data loaded successfully.");
            }
            Err(e) => {
                let reason = e.to_string();
                Logger::log(
                    e.severity(),
                    Event::DocumentFallback,
                    &[("code", e.code()), ("path", path.as_str()), ("reason", reason.as_str())],
                );
                self.persister.install_skeleton(DocumentSkeleton::empty());
                self.notice(
                    e.severity(),
                    format!("{}. Starting with an empty table.", reason),
                );
            }
        }

        self.resort();
        self.rows_changed();
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[Row] {
        self.store.rows()
    }

    pub fn display_rows(&self) -> Vec<DisplayRow> {
        self.store.display_rows()
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// Form fields; editing them directly never schedules a save.
    pub fn buffer_mut(&mut self) -> &mut EditBuffer {
        &mut self.buffer
    }

    pub fn selection(&self) -> Option<i64> {
        self.selection
    }

    pub fn sort_state(&self) -> SortState {
        self.sort_state
    }

    /// Column headings with the active sort arrow.
    pub fn headings(&self) -> Vec<String> {
        SortColumn::ALL
            .iter()
            .map(|column| self.sort_state.heading(*column))
            .collect()
    }

    pub fn document_path(&self) -> &Path {
        self.persister.target_path()
    }

    pub fn is_save_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// When the pending save fires, if one is armed.
    pub fn next_save_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    pub fn last_save(&self) -> Option<&SaveReport> {
        self.last_save.as_ref()
    }

    /// Takes every queued notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    // ------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------

    /// Selects a row and copies it into the edit buffer.
    pub fn select(&mut self, rank: i64) -> ValidationResult<()> {
        let row = match self.store.get(rank).cloned() {
            Some(row) => row,
            None => return Err(self.reject("select", ValidationError::NotFound(rank))),
        };

        self.buffer.load(&row);
        self.selection = Some(rank);
        self.notifications
            .push_back(Notification::SelectionChanged(Some(rank)));
        Ok(())
    }

    /// Drops the selection and empties the edit buffer.
    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.buffer.reset();
        self.notifications
            .push_back(Notification::SelectionChanged(None));
    }

    /// Flips one status slot (0-based) in the edit buffer.
    pub fn toggle_slot(&mut self, slot: usize) -> ValidationResult<bool> {
        self.buffer
            .toggle(slot)
            .map_err(|e| self.reject("toggle", e))
    }

    /// Adds a row from the edit buffer's fields and status.
    pub fn add_from_buffer(&mut self) -> ValidationResult<i64> {
        let rank = self.buffer.rank.clone();
        let team = self.buffer.team.clone();
        let points = self.buffer.points.clone();
        let status = self.buffer.status();
        self.add(&rank, &team, &points, status)
    }

    /// Validates and adds a row, then selects it.
    ///
    /// Returns the new row's rank.
    pub fn add(
        &mut self,
        rank: &str,
        team: &str,
        points: &str,
        status: Status,
    ) -> ValidationResult<i64> {
        let added = match self.store.add(rank, team, points, status).cloned() {
            Ok(row) => row,
            Err(e) => return Err(self.reject("add", e)),
        };

        let rank_text = added.rank.to_string();
        self.commit(
            Event::RowAdded,
            "Entry added.",
            &[("rank", rank_text.as_str()), ("team", added.team.as_str())],
        );

        self.buffer.load(&added);
        self.selection = Some(added.rank);
        self.notifications
            .push_back(Notification::SelectionChanged(Some(added.rank)));
        Ok(added.rank)
    }

    /// Writes the edit buffer's status to the selected row.
    pub fn update_selected_status(&mut self) -> ValidationResult<()> {
        let rank = self.require_selection("update")?;
        let status = self.buffer.status();
        self.update_status(rank, status)
    }

    /// Replaces only the status of the row with `rank`.
    pub fn update_status(&mut self, rank: i64, status: Status) -> ValidationResult<()> {
        if let Err(e) = self.store.update_status(rank, status) {
            return Err(self.reject("update", e));
        }

        let rank_text = rank.to_string();
        let status_text = status.to_display();
        self.commit(
            Event::RowUpdated,
            "Entry status updated.",
            &[("rank", rank_text.as_str()), ("status", status_text.as_str())],
        );
        Ok(())
    }

    /// Deletes the selected row. Confirmation is the caller's job.
    pub fn delete_selected(&mut self) -> ValidationResult<Row> {
        let rank = self.require_selection("delete")?;
        self.delete(rank)
    }

    /// Deletes the row with `rank`.
    pub fn delete(&mut self, rank: i64) -> ValidationResult<Row> {
        let removed = match self.store.delete(rank) {
            Ok(row) => row,
            Err(e) => return Err(self.reject("delete", e)),
        };

        if self.selection == Some(rank) {
            self.clear_selection();
        }

        let rank_text = rank.to_string();
        self.commit(
            Event::RowDeleted,
            "Entry deleted.",
            &[("rank", rank_text.as_str()), ("team", removed.team.as_str())],
        );
        Ok(removed)
    }

    /// Removes every row. Confirmation is the caller's job.
    ///
    /// Returns how many rows were removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.store.clear();
        if self.selection.is_some() {
            self.clear_selection();
        } else {
            self.buffer.reset();
        }

        let removed_text = removed.to_string();
        self.commit(
            Event::RowsCleared,
            "All data cleared.",
            &[("removed", removed_text.as_str())],
        );
        removed
    }

    /// Header click on `column`: flips direction if already active,
    /// otherwise sorts ascending by it. Never schedules a save.
    pub fn sort_by(&mut self, column: SortColumn) -> SortResult<()> {
        let mut state = self.sort_state;
        state.toggle(column);
        self.apply_sort(state)
    }

    /// Header click by label (`#`, `Rank`, `Team`, `Points`, `Status`).
    pub fn sort_by_label(&mut self, label: &str) -> SortResult<()> {
        match SortColumn::from_label(label) {
            Ok(column) => self.sort_by(column),
            Err(e) => {
                self.notice(e.severity(), e.to_string());
                Err(e)
            }
        }
    }

    /// Sorts by `column` in an explicit direction.
    pub fn sort(&mut self, column: SortColumn, direction: SortDirection) -> SortResult<()> {
        self.apply_sort(SortState::new(column, direction))
    }

    fn apply_sort(&mut self, state: SortState) -> SortResult<()> {
        if let Err(e) = self.store.sort(state) {
            let reason = e.to_string();
            Logger::error(Event::RowsSorted, &[("code", e.code()), ("reason", reason.as_str())]);
            self.notice(e.severity(), reason);
            return Err(e);
        }

        self.sort_state = state;
        let direction = if state.direction.is_descending() { "desc" } else { "asc" };
        Logger::trace(
            Event::RowsSorted,
            &[("column", state.column.label()), ("direction", direction)],
        );
        self.rows_changed();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Runs the pending save if it is due now.
    ///
    /// Returns `None` when nothing was due.
    pub fn tick(&mut self) -> Option<SaveResult<SaveReport>> {
        self.tick_at(Instant::now())
    }

    /// Runs the pending save if it is due at `now`.
    pub fn tick_at(&mut self, now: Instant) -> Option<SaveResult<SaveReport>> {
        if !self.scheduler.take_due(now) {
            return None;
        }
        Some(self.run_save())
    }

    /// Saves immediately, dropping any pending timer.
    pub fn save_now(&mut self) -> SaveResult<SaveReport> {
        if self.scheduler.cancel_pending() {
            Logger::trace(Event::SaveCancelled, &[("reason", "forced save")]);
        }
        self.run_save()
    }

    /// Drops any pending save without running it.
    ///
    /// Returns `true` if a save was pending (its edits are not written).
    pub fn shutdown(&mut self) -> bool {
        let dropped = self.scheduler.cancel_pending();
        if dropped {
            Logger::warn(Event::SaveCancelled, &[("reason", "shutdown")]);
        }
        Logger::info(
            Event::EditorShutdown,
            &[("pending_save_dropped", if dropped { "true" } else { "false" })],
        );
        dropped
    }

    fn run_save(&mut self) -> SaveResult<SaveReport> {
        let order_before = self.store.ranks();

        let report = match self.persister.perform_save(&mut self.store) {
            Ok(report) => report,
            Err(e) => {
                let reason = e.to_string();
                Logger::error(Event::SaveFailed, &[("code", e.code()), ("reason", reason.as_str())]);
                self.notice(e.severity(), format!("Error auto-saving data: {}", reason));
                return Err(e);
            }
        };

        self.report_backup(&report.backup);

        let path = report.path.display().to_string();
        let rows = report.row_count.to_string();
        let bytes = report.bytes.to_string();
        let checksum = format!("{:08x}", report.checksum);
        let saved_at = report.saved_at.to_rfc3339();
        Logger::info(
            Event::SaveComplete,
            &[
                ("path", path.as_str()),
                ("rows", rows.as_str()),
                ("bytes", bytes.as_str()),
                ("checksum", checksum.as_str()),
                ("saved_at", saved_at.as_str()),
                ("directory_synced", if report.directory_synced { "true" } else { "false" }),
            ],
        );
        self.notice(Severity::Info, "Data auto-saved successfully!");

        // The save left the store in rank order; restore the view order.
        self.resort();
        if self.store.ranks() != order_before {
            self.rows_changed();
        }

        self.last_save = Some(report.clone());
        Ok(report)
    }

    fn report_backup(&mut self, outcome: &BackupOutcome) {
        match outcome {
            BackupOutcome::Skipped => {}
            BackupOutcome::Copied { bytes } => {
                let bytes = bytes.to_string();
                let path = self.persister.backup_path().display().to_string();
                Logger::trace(
                    Event::BackupComplete,
                    &[("path", path.as_str()), ("bytes", bytes.as_str())],
                );
            }
            BackupOutcome::Failed { reason } => {
                Logger::warn(Event::BackupFailed, &[("reason", reason.as_str())]);
                self.notice(
                    Severity::Warn,
                    format!("Backup failed ({}), saved anyway.", reason),
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Bookkeeping after a successful mutation.
    fn commit(&mut self, event: Event, message: &str, fields: &[(&str, &str)]) {
        Logger::info(event, fields);

        self.resort();
        self.rows_changed();
        self.notice(Severity::Info, message);

        let superseded = self.scheduler.request_save(Instant::now());
        let delay_ms = self.scheduler.idle_delay().as_millis().to_string();
        Logger::trace(
            Event::SaveScheduled,
            &[
                ("delay_ms", delay_ms.as_str()),
                ("superseded", if superseded { "true" } else { "false" }),
            ],
        );
    }

    fn require_selection(&mut self, intent: &str) -> ValidationResult<i64> {
        match self.selection {
            Some(rank) => Ok(rank),
            None => Err(self.reject(intent, ValidationError::NoSelection)),
        }
    }

    /// Logs and reports a rejected intent, handing the error back.
    fn reject(&mut self, intent: &str, error: ValidationError) -> ValidationError {
        let reason = error.to_string();
        Logger::warn(
            Event::IntentRejected,
            &[("code", error.code()), ("intent", intent), ("reason", reason.as_str())],
        );
        self.notice(error.severity(), reason);
        error
    }

    /// Re-applies the remembered sort after the row set changed.
    fn resort(&mut self) {
        if let Err(e) = self.store.sort(self.sort_state) {
            let reason = e.to_string();
            Logger::error(Event::RowsSorted, &[("code", e.code()), ("reason", reason.as_str())]);
            self.notice(e.severity(), reason);
        }
    }

    fn rows_changed(&mut self) {
        self.notifications
            .push_back(Notification::RowsChanged(self.store.display_rows()));
    }

    fn notice(&mut self, severity: Severity, message: impl Into<String>) {
        self.notifications
            .push_back(Notification::Status(Notice::new(severity, message)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RowWarning;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    const DOC: &str = "<html><body><h1>BGMI</h1><table>\
        <thead><tr><th>#</th><th>Team</th><th>Points</th><th>Status</th></tr></thead>\
        <tbody>\
        <tr><td>1</td><td>Alpha</td><td>50</td><td>🟩🟩🟥🟥</td></tr>\
        <tr><td>2</td><td>Beta</td><td>40</td><td>🟩🟥🟥🟥</td></tr>\
        </tbody></table></body></html>";

    fn open_with(dir: &TempDir, content: Option<&str>) -> StandingsEditor {
        let path = dir.path().join("BGMI.html");
        if let Some(content) = content {
            fs::write(&path, content).unwrap();
        }
        StandingsEditor::open(&EditorConfig::for_document(path))
    }

    fn after_delay() -> Instant {
        Instant::now() + Duration::from_millis(2000)
    }

    fn notices(editor: &mut StandingsEditor) -> Vec<Notice> {
        editor
            .drain_notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Status(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_open_loads_rows() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));

        assert_eq!(editor.store().ranks(), vec![1, 2]);
        assert_eq!(editor.display_rows()[0].cells[3], "✅✅❌❌");
        assert!(!editor.is_save_pending());

        let notifications = editor.drain_notifications();
        assert!(notifications
            .iter()
            .any(|n| matches!(n, Notification::RowsChanged(rows) if rows.len() == 2)));
    }

    #[test]
    fn test_open_missing_document_falls_back() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, None);

        assert!(editor.store().is_empty());
        let notices = notices(&mut editor);
        assert_eq!(notices[0].severity, Severity::Warn);

        editor.add("1", "Alpha", "10", Status::eliminated()).unwrap();
        editor.save_now().unwrap();
        assert!(fs::read_to_string(editor.document_path())
            .unwrap()
            .contains("Alpha"));
    }

    #[test]
    fn test_open_reports_row_warnings() {
        let dir = TempDir::new().unwrap();
        let doc = DOC.replace("<td>40</td>", "<td>forty</td>");
        let mut editor = open_with(&dir, Some(&doc));

        assert_eq!(editor.store().ranks(), vec![1]);
        let warnings: Vec<_> = editor
            .drain_notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::LoadWarning(w) => Some(w),
                _ => None,
            })
            .collect();
        assert_eq!(warnings, vec![RowWarning::NonNumeric(2)]);
    }

    #[test]
    fn test_add_selects_and_schedules() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));

        assert_eq!(editor.add("3", "Gamma", "30", Status::eliminated()), Ok(3));
        assert_eq!(editor.selection(), Some(3));
        assert_eq!(editor.buffer().team, "Gamma");
        assert!(editor.is_save_pending());
    }

    #[test]
    fn test_rejected_add_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));
        editor.drain_notifications();

        let result = editor.add("1", "Dup", "10", Status::eliminated());

        assert_eq!(result, Err(ValidationError::DuplicateRank(1)));
        assert_eq!(editor.store().len(), 2);
        assert!(!editor.is_save_pending());
        let notices = notices(&mut editor);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Error);
        assert_eq!(notices[0].message, "# 1 already exists!");
    }

    #[test]
    fn test_toggle_does_not_schedule() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));
        editor.select(2).unwrap();

        assert_eq!(editor.toggle_slot(1), Ok(true));
        assert_eq!(editor.toggle_slot(4), Err(ValidationError::InvalidSlot(4)));
        assert!(!editor.is_save_pending());
        assert_eq!(editor.rows()[1].status.to_display(), "✅❌❌❌");

        editor.update_selected_status().unwrap();
        assert_eq!(editor.rows()[1].status.to_display(), "✅✅❌❌");
        assert!(editor.is_save_pending());
    }

    #[test]
    fn test_update_and_delete_require_selection() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));

        assert_eq!(
            editor.update_selected_status(),
            Err(ValidationError::NoSelection)
        );
        assert_eq!(editor.delete_selected(), Err(ValidationError::NoSelection));
        assert_eq!(editor.select(9), Err(ValidationError::NotFound(9)));
        assert!(!editor.is_save_pending());
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));
        editor.select(1).unwrap();

        let removed = editor.delete_selected().unwrap();

        assert_eq!(removed.team, "Alpha");
        assert_eq!(editor.selection(), None);
        assert_eq!(editor.buffer(), &EditBuffer::new());
        assert_eq!(editor.store().ranks(), vec![2]);
    }

    #[test]
    fn test_clear_all_schedules_save() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));

        assert_eq!(editor.clear_all(), 2);
        assert!(editor.store().is_empty());
        assert!(editor.is_save_pending());
    }

    #[test]
    fn test_sort_is_remembered_and_never_saves() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));

        editor.sort_by(SortColumn::Rank).unwrap();
        assert_eq!(editor.store().ranks(), vec![2, 1]);
        assert_eq!(editor.headings()[0], "# ▼");
        assert!(!editor.is_save_pending());

        editor.add("3", "Gamma", "30", Status::eliminated()).unwrap();
        assert_eq!(editor.store().ranks(), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_by_unknown_label() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));

        assert!(editor.sort_by_label("Kills").is_err());
        assert_eq!(editor.sort_state(), SortState::default());
    }

    #[test]
    fn test_tick_saves_once_and_keeps_view_order() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));
        editor
            .sort(SortColumn::Team, SortDirection::Desc)
            .unwrap();
        editor.add("3", "Gamma", "30", Status::eliminated()).unwrap();

        assert!(editor.tick_at(Instant::now()).is_none());
        let report = editor.tick_at(after_delay()).unwrap().unwrap();

        assert_eq!(report.row_count, 3);
        assert!(editor.tick_at(after_delay()).is_none());
        assert_eq!(editor.store().ranks(), vec![3, 2, 1]);

        let written = fs::read_to_string(editor.document_path()).unwrap();
        let alpha = written.find("Alpha").unwrap();
        let gamma = written.find("Gamma").unwrap();
        assert!(alpha < gamma);
        assert!(!written.contains("<h1>"));
        assert_eq!(editor.last_save(), Some(&report));
    }

    #[test]
    fn test_shutdown_drops_pending_save() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));
        editor.delete(2).unwrap();

        assert!(editor.shutdown());
        assert!(editor.tick_at(after_delay()).is_none());
        assert!(fs::read_to_string(editor.document_path())
            .unwrap()
            .contains("Beta"));
    }

    #[test]
    fn test_save_now_cancels_timer() {
        let dir = TempDir::new().unwrap();
        let mut editor = open_with(&dir, Some(DOC));
        editor.delete(2).unwrap();

        let report = editor.save_now().unwrap();

        assert_eq!(report.row_count, 1);
        assert!(matches!(report.backup, BackupOutcome::Copied { .. }));
        assert!(!editor.is_save_pending());
        assert!(fs::read_to_string(dir.path().join("BGMI.html.bak"))
            .unwrap()
            .contains("Beta"));
    }
}
