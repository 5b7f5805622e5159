//! CLI command implementations
//!
//! `edit` runs the interactive console on a current-thread tokio runtime.
//! One task owns the editor; stdin lines and the save deadline are awaited
//! together with `select!`, so a save can never interleave with an edit.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::{sleep_until, Instant};

use crate::codec::DocumentCodec;
use crate::editor::{EditorConfig, Notification, StandingsEditor};
use crate::observability::{Event, Logger, Severity};
use crate::sort::{RowSorter, SortColumn};
use crate::standings::{DisplayRow, Row};

use super::args::{Cli, Command};
use super::console::{is_affirmative, ConsoleCommand, FormField, HELP};
use super::errors::CliResult;
use super::io::{
    render_form, render_table, rows_json, write_notice, write_prompt, write_response, write_table,
};

const PROMPT: &str = "standings> ";

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    if cli.verbose {
        Logger::set_min_severity(Severity::Trace);
    }
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Edit { config, file } => edit(&config, file),
        Command::Show { config, file, json } => show(&config, file, json),
    }
}

/// Loads the config file (defaults if absent) and applies `--file`.
pub fn load_config(config_path: &Path, file: Option<PathBuf>) -> CliResult<EditorConfig> {
    let mut config = EditorConfig::load_or_default(config_path)?;
    if let Some(file) = file {
        config.document_path = file;
        config.validate()?;
    }

    let config_text = config_path.display().to_string();
    let document = config.document_path.display().to_string();
    Logger::info(
        Event::ConfigLoaded,
        &[("config", config_text.as_str()), ("document", document.as_str())],
    );
    Ok(config)
}

/// Print the standings and exit
///
/// Rows are shown in the configured sort order. Row warnings are logged;
/// a document that cannot be loaded at all is an error here, since there is
/// nothing to fall back to.
pub fn show(config_path: &Path, file: Option<PathBuf>, json: bool) -> CliResult<()> {
    let config = load_config(config_path, file)?;
    let decoded = DocumentCodec::read_file(&config.document_path)?;

    for warning in &decoded.warnings {
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
    }

    let mut rows: Vec<DisplayRow> = decoded.rows.iter().map(Row::to_display_row).collect();
    let state = config.sort_state();
    RowSorter::sort_by_state(&mut rows, state)?;

    let mut stdout = io::stdout().lock();
    if json {
        let path = config.document_path.display().to_string();
        write_response(&mut stdout, rows_json(&path, &rows))?;
    } else {
        let headings: Vec<String> = SortColumn::ALL
            .iter()
            .map(|column| state.heading(*column))
            .collect();
        stdout.write_all(render_table(&headings, &rows, None).as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}

/// Edit the standings interactively
///
/// Opens the document (falling back to an empty one), then serves console
/// commands from stdin until `quit` or end of input.
pub fn edit(config_path: &Path, file: Option<PathBuf>) -> CliResult<()> {
    let config = load_config(config_path, file)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut editor = StandingsEditor::open(&config);
        let input = BufReader::new(tokio::io::stdin());
        let mut stdout = io::stdout();
        run_console(&mut editor, input, &mut stdout).await
    })
}

/// Console event loop
///
/// Waits on the next input line and the pending save deadline at once.
/// End of input behaves like `quit`: any pending save is dropped.
pub async fn run_console<R, W>(
    editor: &mut StandingsEditor,
    input: R,
    out: &mut W,
) -> CliResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut session = ConsoleSession::default();

    flush_notifications(editor, out)?;
    write_prompt(out, session.prompt())?;

    loop {
        let deadline = editor.next_save_deadline();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                let flow = session.handle_line(editor, &line, out)?;
                flush_notifications(editor, out)?;
                if flow == Flow::Quit {
                    break;
                }
                write_prompt(out, session.prompt())?;
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                // Outcome is reported through notifications
                let _ = editor.tick();
                writeln!(out)?;
                flush_notifications(editor, out)?;
                write_prompt(out, session.prompt())?;
            }
        }
    }

    editor.shutdown();
    writeln!(out)?;
    flush_notifications(editor, out)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Per-session console state: a destructive command waiting for y/N.
#[derive(Debug, Default)]
struct ConsoleSession {
    awaiting: Option<(ConsoleCommand, String)>,
}

impl ConsoleSession {
    fn prompt(&self) -> &str {
        match &self.awaiting {
            Some((_, question)) => question.as_str(),
            None => PROMPT,
        }
    }

    fn handle_line<W: Write>(
        &mut self,
        editor: &mut StandingsEditor,
        line: &str,
        out: &mut W,
    ) -> CliResult<Flow> {
        if let Some((command, _)) = self.awaiting.take() {
            if is_affirmative(line) {
                return execute(editor, command, out);
            }
            writeln!(out, "cancelled")?;
            return Ok(Flow::Continue);
        }

        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        match line.parse::<ConsoleCommand>() {
            Ok(command) if command.needs_confirmation() => {
                let question = match (&command, editor.selection()) {
                    // Nothing to confirm; let the editor report it
                    (ConsoleCommand::Delete, None) => None,
                    (ConsoleCommand::Delete, Some(rank)) => {
                        Some(format!("Delete entry # {}? [y/N] ", rank))
                    }
                    _ => Some("Delete ALL entries? [y/N] ".to_string()),
                };
                match question {
                    Some(question) => {
                        self.awaiting = Some((command, question));
                        Ok(Flow::Continue)
                    }
                    None => execute(editor, command, out),
                }
            }
            Ok(command) => execute(editor, command, out),
            Err(e) => {
                writeln!(out, "{}", e)?;
                Ok(Flow::Continue)
            }
        }
    }
}

/// Runs one command. Intent results are reported through notifications.
fn execute<W: Write>(
    editor: &mut StandingsEditor,
    command: ConsoleCommand,
    out: &mut W,
) -> CliResult<Flow> {
    match command {
        ConsoleCommand::List => write_table(out, editor)?,
        ConsoleCommand::Select(rank) => {
            if editor.select(rank).is_ok() {
                write_form(out, editor)?;
            }
        }
        ConsoleCommand::Deselect => editor.clear_selection(),
        ConsoleCommand::Set(field, value) => {
            let buffer = editor.buffer_mut();
            match field {
                FormField::Rank => buffer.rank = value,
                FormField::Team => buffer.team = value,
                FormField::Points => buffer.points = value,
            }
            write_form(out, editor)?;
        }
        ConsoleCommand::Toggle(slot) => {
            if editor.toggle_slot(slot).is_ok() {
                write_form(out, editor)?;
            }
        }
        ConsoleCommand::Add => {
            let _ = editor.add_from_buffer();
        }
        ConsoleCommand::Update => {
            let _ = editor.update_selected_status();
        }
        ConsoleCommand::Delete => {
            let _ = editor.delete_selected();
        }
        ConsoleCommand::Clear => {
            editor.clear_all();
        }
        ConsoleCommand::Sort(label) => {
            let _ = editor.sort_by_label(&label);
        }
        ConsoleCommand::Save => {
            let _ = editor.save_now();
        }
        ConsoleCommand::Help => writeln!(out, "{}", HELP)?,
        ConsoleCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn write_form<W: Write>(out: &mut W, editor: &StandingsEditor) -> CliResult<()> {
    out.write_all(render_form(editor.buffer(), editor.selection()).as_bytes())?;
    Ok(())
}

/// Prints queued notifications; the table is printed once, last.
fn flush_notifications<W: Write>(editor: &mut StandingsEditor, out: &mut W) -> CliResult<()> {
    let mut latest_rows = None;

    for notification in editor.drain_notifications() {
        match notification {
            Notification::RowsChanged(rows) => latest_rows = Some(rows),
            Notification::Status(notice) => write_notice(out, &notice)?,
            Notification::LoadWarning(warning) => writeln!(out, "[WARN] {}", warning)?,
            Notification::SelectionChanged(_) => {}
        }
    }

    if let Some(rows) = latest_rows {
        let table = render_table(&editor.headings(), &rows, editor.selection());
        out.write_all(table.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}
