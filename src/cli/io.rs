//! Console output
//!
//! Everything the front end prints goes through here. Logs go to stderr,
//! so stdout carries only the table, status lines and prompts.

use std::io::Write;

use serde_json::{json, Value};

use super::errors::CliResult;
use crate::editor::{Notice, StandingsEditor};
use crate::standings::DisplayRow;
use crate::store::EditBuffer;

/// Renders rows as an aligned text table.
///
/// The row whose rank equals `selection` is marked with `>`.
pub fn render_table(headings: &[String], rows: &[DisplayRow], selection: Option<i64>) -> String {
    let mut widths: Vec<usize> = headings.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, "  ", headings.iter().map(String::as_str), &widths);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, "  ", rule.iter().map(String::as_str), &widths);

    for row in rows {
        let selected = selection.is_some_and(|rank| row.cells[0] == rank.to_string());
        let marker = if selected { "> " } else { "  " };
        push_line(&mut out, marker, row.cells.iter().map(String::as_str), &widths);
    }

    if rows.is_empty() {
        out.push_str("  (no rows)\n");
    }
    out
}

fn push_line<'a>(
    out: &mut String,
    marker: &str,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) {
    out.push_str(marker);
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

/// Renders the edit form.
pub fn render_form(buffer: &EditBuffer, selection: Option<i64>) -> String {
    let selected = match selection {
        Some(rank) => format!("editing # {}", rank),
        None => "new entry".to_string(),
    };
    format!(
        "[{}] #: {:?}  Team: {:?}  Points: {:?}  Status: {}\n",
        selected,
        buffer.rank,
        buffer.team,
        buffer.points,
        buffer.status().to_display()
    )
}

/// Writes the editor's current table.
pub fn write_table<W: Write>(out: &mut W, editor: &StandingsEditor) -> CliResult<()> {
    let table = render_table(
        &editor.headings(),
        &editor.display_rows(),
        editor.selection(),
    );
    out.write_all(table.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Writes one status line.
pub fn write_notice<W: Write>(out: &mut W, notice: &Notice) -> CliResult<()> {
    writeln!(out, "{}", notice)?;
    out.flush()?;
    Ok(())
}

/// Writes a prompt without a trailing newline.
pub fn write_prompt<W: Write>(out: &mut W, prompt: &str) -> CliResult<()> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    Ok(())
}

/// Rows as a JSON object for `show --json`.
pub fn rows_json(path: &str, rows: &[DisplayRow]) -> Value {
    let rows: Vec<Value> = rows
        .iter()
        .map(|row| {
            json!({
                "rank": row.cells[0],
                "team": row.cells[1],
                "points": row.cells[2],
                "status": row.cells[3],
            })
        })
        .collect();
    json!({ "path": path, "rows": rows })
}

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}
