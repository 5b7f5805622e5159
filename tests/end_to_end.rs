//! End-to-End Editing Scenarios
//!
//! Drives `StandingsEditor` the way a front end does and checks the document
//! on disk. Time runs on tokio's paused clock so idle delays are exact.

use standings::editor::{EditorConfig, Notification, StandingsEditor};
use standings::observability::Severity;
use standings::persist::BackupOutcome;
use standings::standings::Status;
use standings::store::ValidationError;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::advance;

// =============================================================================
// Test Utilities
// =============================================================================

const TWO_TEAMS: &str = "<html><body><h1>BGMI</h1>\n<table>\n\
    <thead><tr><th>#</th><th>Team</th><th>Points</th><th>Status</th></tr></thead>\n\
    <tbody>\n\
    <tr><td>1</td><td>Alpha</td><td>50</td><td>🟩🟩🟥🟥</td></tr>\n\
    <tr><td>2</td><td>Beta</td><td>40</td><td>🟩🟥🟥🟥</td></tr>\n\
    </tbody>\n</table>\n</body></html>\n";

struct Fixture {
    _dir: TempDir,
    document: PathBuf,
    backup: PathBuf,
}

fn fixture(content: Option<&str>) -> Fixture {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let document = dir.path().join("BGMI.html");
    let backup = dir.path().join("BGMI.html.bak");
    if let Some(content) = content {
        fs::write(&document, content).expect("Failed to write document");
    }
    Fixture {
        _dir: dir,
        document,
        backup,
    }
}

fn open(fixture: &Fixture) -> StandingsEditor {
    StandingsEditor::open(&EditorConfig::for_document(&fixture.document))
}

/// Polls the editor every 100ms for `span`, returning how many saves ran.
async fn run_for(editor: &mut StandingsEditor, span: Duration) -> usize {
    let mut saves = 0;
    let step = Duration::from_millis(100);
    let mut elapsed = Duration::ZERO;
    while elapsed < span {
        advance(step).await;
        elapsed += step;
        if let Some(result) = editor.tick() {
            result.expect("save must succeed");
            saves += 1;
        }
    }
    saves
}

fn body_rows(html: &str) -> Vec<String> {
    let reread = standings::codec::DocumentCodec::decode(html).expect("saved document must decode");
    reread
        .rows
        .iter()
        .map(|row| format!("{}|{}|{}|{}", row.rank, row.team, row.points, row.status.to_document()))
        .collect()
}

// =============================================================================
// Scenario 1: load, add, save
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_load_add_then_autosave() {
    let fixture = fixture(Some(TWO_TEAMS));
    let mut editor = open(&fixture);
    assert_eq!(editor.store().ranks(), vec![1, 2]);

    editor
        .add("3", "Gamma", "30", Status::eliminated())
        .expect("add must succeed");

    // Nothing is written before the idle delay passes
    advance(Duration::from_millis(1999)).await;
    assert!(editor.tick().is_none());
    assert_eq!(fs::read_to_string(&fixture.document).unwrap(), TWO_TEAMS);

    advance(Duration::from_millis(1)).await;
    let report = editor
        .tick()
        .expect("save must be due")
        .expect("save must succeed");

    assert_eq!(report.row_count, 3);
    assert_eq!(
        report.backup,
        BackupOutcome::Copied {
            bytes: TWO_TEAMS.len() as u64
        }
    );
    assert_eq!(fs::read_to_string(&fixture.backup).unwrap(), TWO_TEAMS);

    let saved = fs::read_to_string(&fixture.document).unwrap();
    assert_eq!(
        body_rows(&saved),
        vec![
            "1|Alpha|50|🟩🟩🟥🟥",
            "2|Beta|40|🟩🟥🟥🟥",
            "3|Gamma|30|🟥🟥🟥🟥",
        ]
    );
    assert!(!saved.contains("<h1>"));
    assert!(!saved.contains('✅'));
    assert_eq!(report.bytes, saved.len());
}

// =============================================================================
// Scenario 2: rejected duplicate
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_duplicate_rank_rejected_without_save() {
    let fixture = fixture(Some(TWO_TEAMS));
    let mut editor = open(&fixture);
    editor.drain_notifications();

    let result = editor.add("1", "Dup", "10", Status::eliminated());

    assert_eq!(result, Err(ValidationError::DuplicateRank(1)));
    assert_eq!(editor.store().len(), 2);
    assert!(!editor.is_save_pending());

    let notifications = editor.drain_notifications();
    assert!(notifications.iter().any(|n| matches!(
        n,
        Notification::Status(notice)
            if notice.severity == Severity::Error && notice.message == "# 1 already exists!"
    )));
    assert!(!notifications
        .iter()
        .any(|n| matches!(n, Notification::RowsChanged(_))));

    assert_eq!(run_for(&mut editor, Duration::from_secs(5)).await, 0);
    assert_eq!(fs::read_to_string(&fixture.document).unwrap(), TWO_TEAMS);
}

// =============================================================================
// Scenario 3: delete then add within the idle window
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_delete_then_add_saves_once() {
    let fixture = fixture(Some(TWO_TEAMS));
    let mut editor = open(&fixture);

    editor.select(2).unwrap();
    editor.delete_selected().expect("delete must succeed");

    advance(Duration::from_millis(500)).await;
    assert!(editor.tick().is_none());

    editor
        .add("4", "Delta", "20", Status::new([true, false, true, false]))
        .expect("add must succeed");

    let saves = run_for(&mut editor, Duration::from_secs(5)).await;

    assert_eq!(saves, 1);
    assert_eq!(editor.store().ranks(), vec![1, 4]);
    let saved = fs::read_to_string(&fixture.document).unwrap();
    assert_eq!(
        body_rows(&saved),
        vec!["1|Alpha|50|🟩🟩🟥🟥", "4|Delta|20|🟩🟥🟩🟥"]
    );
}

// =============================================================================
// Startup fallbacks
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_missing_document_created_on_first_save() {
    let fixture = fixture(None);
    let mut editor = open(&fixture);

    let notifications = editor.drain_notifications();
    assert!(notifications.iter().any(|n| matches!(
        n,
        Notification::Status(notice) if notice.severity == Severity::Warn
    )));

    editor.add("1", "Solo", "5", Status::eliminated()).unwrap();
    assert_eq!(run_for(&mut editor, Duration::from_secs(3)).await, 1);

    let report = editor.last_save().expect("a save must have run");
    assert_eq!(report.backup, BackupOutcome::Skipped);
    assert!(!fixture.backup.exists());

    let saved = fs::read_to_string(&fixture.document).unwrap();
    assert!(saved.contains("<th>#</th>"));
    assert_eq!(body_rows(&saved), vec!["1|Solo|5|🟥🟥🟥🟥"]);
}

#[tokio::test(start_paused = true)]
async fn test_document_without_table_falls_back_and_saves() {
    let fixture = fixture(Some("<html><body><p>no table yet</p></body></html>"));
    let mut editor = open(&fixture);

    let notifications = editor.drain_notifications();
    assert!(notifications.iter().any(|n| matches!(
        n,
        Notification::Status(notice) if notice.severity == Severity::Error
    )));
    assert!(editor.store().is_empty());

    editor.add("1", "First", "1", Status::eliminated()).unwrap();
    let report = editor.save_now().expect("save must succeed");

    // The unusable original is still kept as the backup
    assert!(matches!(report.backup, BackupOutcome::Copied { .. }));
    assert!(fs::read_to_string(&fixture.backup)
        .unwrap()
        .contains("no table yet"));
    assert_eq!(
        body_rows(&fs::read_to_string(&fixture.document).unwrap()),
        vec!["1|First|1|🟥🟥🟥🟥"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_team_spacing_survives_reload() {
    let fixture = fixture(Some(TWO_TEAMS));
    let mut editor = open(&fixture);

    editor.add("3", "Team   Soul", "30", Status::eliminated()).unwrap();
    editor.save_now().expect("save must succeed");
    let in_memory = editor.rows().to_vec();

    let reopened = open(&fixture);
    assert_eq!(reopened.rows(), in_memory.as_slice());
    assert_eq!(reopened.rows()[2].team, "Team   Soul");
}

#[tokio::test(start_paused = true)]
async fn test_sorted_view_survives_save() {
    let fixture = fixture(Some(TWO_TEAMS));
    let mut editor = open(&fixture);

    editor.sort_by_label("Points").unwrap();
    editor.sort_by_label("points").unwrap();
    assert_eq!(editor.store().ranks(), vec![1, 2]);

    editor.add("3", "Gamma", "90", Status::eliminated()).unwrap();
    assert_eq!(editor.store().ranks(), vec![3, 1, 2]);

    assert_eq!(run_for(&mut editor, Duration::from_secs(3)).await, 1);

    // Display order is kept; the file is in rank order
    assert_eq!(editor.store().ranks(), vec![3, 1, 2]);
    let saved = fs::read_to_string(&fixture.document).unwrap();
    assert_eq!(
        body_rows(&saved),
        vec![
            "1|Alpha|50|🟩🟩🟥🟥",
            "2|Beta|40|🟩🟥🟥🟥",
            "3|Gamma|90|🟥🟥🟥🟥",
        ]
    );
}
