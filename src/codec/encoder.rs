//! Document encoder
//!
//! Renders rows into a skeleton. The body is rebuilt from scratch on every
//! call and rows are always written in ascending rank order, whatever order
//! the editor currently shows them in.

use super::markup;
use super::skeleton::DocumentSkeleton;
use crate::standings::{Row, COLUMN_LABELS};

/// Title elements are display-only and never persisted.
const STRIPPED_ELEMENT: &str = "h1";

/// Renders a complete document.
///
/// Output is deterministic: the same skeleton and rows always produce the
/// same bytes.
pub fn encode(skeleton: &DocumentSkeleton, rows: &[Row]) -> String {
    let mut ordered: Vec<&Row> = rows.iter().collect();
    ordered.sort_by_key(|row| row.rank);

    let mut output = String::with_capacity(skeleton.before_table.len() + 128 * (rows.len() + 2));

    output.push_str(&markup::strip_elements(&skeleton.before_table, STRIPPED_ELEMENT));
    output.push_str(&skeleton.table_open);
    if !skeleton.table_head.is_empty() {
        output.push_str("\n ");
        output.push_str(&skeleton.table_head);
    }
    if !skeleton.has_header {
        output.push_str("\n ");
        output.push_str(&default_header());
    }

    output.push_str("\n <tbody>\n");
    for row in ordered {
        output.push_str("  <tr>\n");
        push_cell(&mut output, &row.rank.to_string());
        push_cell(&mut output, &markup::escape_text(&row.team));
        push_cell(&mut output, &row.points.to_string());
        push_cell(&mut output, &row.status.to_document());
        output.push_str("  </tr>\n");
    }
    output.push_str(" </tbody>");
    if !skeleton.table_tail.is_empty() {
        output.push_str("\n ");
        output.push_str(&skeleton.table_tail);
    }
    output.push_str("\n</table>");

    output.push_str(&markup::strip_elements(&skeleton.after_table, STRIPPED_ELEMENT));
    output
}

fn push_cell(output: &mut String, content: &str) {
    output.push_str("   <td>");
    output.push_str(content);
    output.push_str("</td>\n");
}

/// `<thead>` with the canonical labels, laid out like the body rows.
fn default_header() -> String {
    let mut header = String::from("<thead>\n  <tr>\n");
    for label in COLUMN_LABELS {
        header.push_str("   <th>");
        header.push_str(&markup::escape_text(label));
        header.push_str("</th>\n");
    }
    header.push_str("  </tr>\n </thead>");
    header
}
