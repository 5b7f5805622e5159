//! Document decoder
//!
//! Locates the first table, validates its header, and turns data rows into
//! [`Row`]s. Malformed rows are dropped with a [`RowWarning`]; only a missing
//! table or a wrong header fails the whole decode.

use std::collections::HashSet;
use std::ops::Range;

use super::errors::{LoadError, LoadResult, RowWarning};
use super::markup::{self, Token, TokenKind};
use super::skeleton::DocumentSkeleton;
use crate::standings::{Row, Status, COLUMN_LABELS, LEGACY_RANK_LABEL};

/// Minimum cells for a usable row, and minimum header labels.
const REQUIRED_COLUMNS: usize = 4;

/// Output of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    /// Valid rows, in document order
    pub rows: Vec<Row>,
    /// Anomalies for rows that were skipped or repaired
    pub warnings: Vec<RowWarning>,
    /// Frame for re-encoding
    pub skeleton: DocumentSkeleton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Bare,
    Head,
    Body,
    Foot,
}

#[derive(Debug)]
struct ScannedCell {
    is_header: bool,
    text: String,
}

#[derive(Debug)]
struct ScannedRow {
    section: Section,
    cells: Vec<ScannedCell>,
}

impl ScannedRow {
    fn has_data_cells(&self) -> bool {
        self.cells.iter().any(|c| !c.is_header)
    }

    fn has_header_cells(&self) -> bool {
        self.cells.iter().any(|c| c.is_header)
    }

    fn data_cells(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|c| !c.is_header)
            .map(|c| c.text.as_str())
            .collect()
    }
}

/// Structure of one table, gathered in a single pass over its tokens.
#[derive(Debug, Default)]
struct TableScan {
    rows: Vec<ScannedRow>,
    thead_span: Option<(usize, usize)>,
    has_thead: bool,
    has_tbody: bool,
}

/// Incremental builder for [`TableScan`].
struct TableWalker<'a> {
    src: &'a str,
    scan: TableScan,
    section: Section,
    row: Option<ScannedRow>,
    cell: Option<ScannedCell>,
    thead_start: Option<usize>,
    nested_tables: usize,
}

impl<'a> TableWalker<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            scan: TableScan::default(),
            section: Section::Bare,
            row: None,
            cell: None,
            thead_start: None,
            nested_tables: 0,
        }
    }

    fn feed(&mut self, token: &Token) {
        if self.nested_tables > 0 {
            if token.is_start("table") {
                self.nested_tables += 1;
            } else if token.is_end("table") {
                self.nested_tables -= 1;
            }
            return;
        }

        match &token.kind {
            TokenKind::Text => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.text.push_str(&self.src[token.span.clone()]);
                }
            }
            TokenKind::StartTag(name) => match name.as_str() {
                "table" => self.nested_tables = 1,
                "thead" => {
                    self.close_row();
                    self.scan.has_thead = true;
                    self.section = Section::Head;
                    self.thead_start.get_or_insert(token.span.start);
                }
                "tbody" => {
                    self.close_row();
                    self.scan.has_tbody = true;
                    self.section = Section::Body;
                }
                "tfoot" => {
                    self.close_row();
                    self.section = Section::Foot;
                }
                "tr" => {
                    self.close_row();
                    self.row = Some(ScannedRow {
                        section: self.section,
                        cells: Vec::new(),
                    });
                }
                "td" | "th" => {
                    self.close_cell();
                    if self.row.is_none() {
                        self.row = Some(ScannedRow {
                            section: self.section,
                            cells: Vec::new(),
                        });
                    }
                    self.cell = Some(ScannedCell {
                        is_header: name == "th",
                        text: String::new(),
                    });
                }
                "br" => {
                    if let Some(cell) = self.cell.as_mut() {
                        cell.text.push(' ');
                    }
                }
                _ => {}
            },
            TokenKind::EndTag(name) => match name.as_str() {
                "td" | "th" => self.close_cell(),
                "tr" => self.close_row(),
                "thead" => {
                    self.close_row();
                    if let Some(start) = self.thead_start {
                        if self.scan.thead_span.is_none() {
                            self.scan.thead_span = Some((start, token.span.end));
                        }
                    }
                    self.section = Section::Bare;
                }
                "tbody" | "tfoot" => {
                    self.close_row();
                    self.section = Section::Bare;
                }
                _ => {}
            },
            TokenKind::Other => {}
        }
    }

    fn close_cell(&mut self) {
        if let Some(mut cell) = self.cell.take() {
            cell.text = markup::decode_entities(&cell.text);
            if let Some(row) = self.row.as_mut() {
                row.cells.push(cell);
            }
        }
    }

    fn close_row(&mut self) {
        self.close_cell();
        if let Some(row) = self.row.take() {
            self.scan.rows.push(row);
        }
    }

    fn finish(mut self) -> TableScan {
        self.close_row();
        self.scan
    }
}

/// Decodes a raw document.
///
/// # Errors
///
/// - `LoadError::NoTable` if there is no `<table>` element
/// - `LoadError::BadHeader` if fewer than four header labels are present or
///   the first label is neither `#` nor `Rank`
pub fn decode(src: &str) -> LoadResult<DecodedDocument> {
    let tokens = markup::scan(src);

    let table_open = tokens
        .iter()
        .position(|t| t.is_start("table"))
        .ok_or(LoadError::NoTable)?;
    let table_close = markup::matching_end(&tokens, table_open, "table");

    let table_tokens = match table_close {
        Some(close) => &tokens[table_open + 1..close],
        None => &tokens[table_open + 1..],
    };
    let mut walker = TableWalker::new(src);
    for token in table_tokens {
        walker.feed(token);
    }
    let scan = walker.finish();

    check_header(&scan)?;

    let inner_start = tokens[table_open].span.end;
    let inner_end = table_close.map_or(src.len(), |close| tokens[close].span.start);
    let body = body_spans(table_tokens, scan.has_tbody, inner_end);
    let insert_at = body
        .first()
        .map(|span| span.start)
        .or(scan.thead_span.map(|(_, end)| end))
        .unwrap_or(inner_end);

    let mut table_tail = String::new();
    let mut copied_to = insert_at;
    for span in &body {
        table_tail.push_str(&src[copied_to..span.start]);
        copied_to = span.end;
    }
    table_tail.push_str(&src[copied_to..inner_end]);

    let skeleton = DocumentSkeleton {
        before_table: src[..tokens[table_open].span.start].to_string(),
        table_open: src[tokens[table_open].span.clone()].to_string(),
        table_head: src[inner_start..insert_at].trim().to_string(),
        table_tail: table_tail.trim().to_string(),
        has_header: scan.has_thead,
        after_table: table_close
            .map(|close| src[tokens[close].span.end..].to_string())
            .unwrap_or_default(),
    };

    let (rows, warnings) = decode_rows(&scan);

    Ok(DecodedDocument {
        rows,
        warnings,
        skeleton,
    })
}

/// Tags that end an unclosed bare row.
const ROW_BOUNDARIES: [&str; 6] = ["tr", "thead", "tbody", "tfoot", "caption", "colgroup"];

/// Byte ranges of the table content that encoding rebuilds: every
/// `<tbody>`, or without one, every row outside `<thead>` and `<tfoot>`.
///
/// `tokens` are the tokens between the table's start and end tags. Spans are
/// returned in source order and never overlap.
fn body_spans(tokens: &[Token], has_tbody: bool, inner_end: usize) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut section = Section::Bare;
    let mut nested_tables = 0usize;
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        if token.is_start("table") {
            nested_tables += 1;
        } else if nested_tables > 0 {
            if token.is_end("table") {
                nested_tables -= 1;
            }
        } else if token.is_start("thead") {
            section = Section::Head;
        } else if token.is_start("tfoot") {
            section = Section::Foot;
        } else if token.is_end("thead") || token.is_end("tfoot") {
            section = Section::Bare;
        } else if has_tbody && token.is_start("tbody") {
            let (end, next) = match markup::matching_end(tokens, index, "tbody") {
                Some(close) => (tokens[close].span.end, close + 1),
                None => (inner_end, tokens.len()),
            };
            spans.push(token.span.start..end);
            index = next;
            continue;
        } else if !has_tbody
            && section == Section::Bare
            && (token.is_start("tr") || token.is_start("td") || token.is_start("th"))
        {
            let (end, next) = bare_row_end(tokens, index, inner_end);
            spans.push(token.span.start..end);
            index = next;
            continue;
        }
        index += 1;
    }

    spans
}

/// End of the bare row starting at `start`: its `</tr>`, or the start of
/// whatever section or row follows. Returns the byte offset and the index of
/// the next unconsumed token.
fn bare_row_end(tokens: &[Token], start: usize, inner_end: usize) -> (usize, usize) {
    let mut nested_tables = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(start + 1) {
        if token.is_start("table") {
            nested_tables += 1;
        } else if nested_tables > 0 {
            if token.is_end("table") {
                nested_tables -= 1;
            }
        } else if token.is_end("tr") {
            return (token.span.end, index + 1);
        } else if ROW_BOUNDARIES.iter().any(|name| token.is_start(name))
            || token.is_end("thead")
            || token.is_end("tfoot")
        {
            return (token.span.start, index);
        }
    }
    (inner_end, tokens.len())
}

/// Header labels are the `<th>` cells of the `<thead>`, or of the whole table
/// when there is no `<thead>`.
fn check_header(scan: &TableScan) -> LoadResult<()> {
    let labels: Vec<String> = scan
        .rows
        .iter()
        .filter(|row| !scan.has_thead || row.section == Section::Head)
        .flat_map(|row| row.cells.iter())
        .filter(|cell| cell.is_header)
        .map(|cell| markup::normalize_whitespace(&cell.text))
        .collect();

    let first_ok = labels
        .first()
        .is_some_and(|first| first == COLUMN_LABELS[0] || first == LEGACY_RANK_LABEL);

    if labels.len() < REQUIRED_COLUMNS || !first_ok {
        return Err(LoadError::BadHeader { found: labels });
    }
    Ok(())
}

fn decode_rows(scan: &TableScan) -> (Vec<Row>, Vec<RowWarning>) {
    let mut candidates: Vec<&ScannedRow> = scan
        .rows
        .iter()
        .filter(|row| {
            if scan.has_tbody {
                row.section == Section::Body
            } else {
                row.section == Section::Bare
            }
        })
        .collect();

    // Header row living among the body rows (no <thead>)
    if candidates
        .first()
        .is_some_and(|row| row.has_header_cells() && !row.has_data_cells())
    {
        candidates.remove(0);
    }

    let mut rows = Vec::new();
    let mut warnings = Vec::new();
    let mut seen_ranks = HashSet::new();

    for (index, scanned) in candidates.into_iter().enumerate() {
        let row_number = index + 1;
        if !scanned.has_data_cells() {
            continue;
        }

        let cells = scanned.data_cells();
        if cells.len() < REQUIRED_COLUMNS {
            warnings.push(RowWarning::TooFewColumns(row_number));
            continue;
        }

        let (Ok(rank), Ok(points)) = (cells[0].trim().parse::<i64>(), cells[2].trim().parse::<i64>())
        else {
            warnings.push(RowWarning::NonNumeric(row_number));
            continue;
        };

        // Internal spacing is kept so a saved team reads back unchanged
        let team = cells[1].trim();
        if team.is_empty() {
            warnings.push(RowWarning::EmptyTeam(row_number));
            continue;
        }

        if !seen_ranks.insert(rank) {
            warnings.push(RowWarning::DuplicateRank {
                row: row_number,
                rank,
            });
            continue;
        }

        let parsed = Status::parse_glyphs(cells[3]);
        if parsed.was_repaired() {
            warnings.push(RowWarning::StatusLengthMismatch {
                row: row_number,
                found: parsed.glyph_count,
            });
        }

        rows.push(Row::new(rank, team, points, parsed.status));
    }

    (rows, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADED: &str = "<table><thead><tr><th>#</th><th>Team</th><th>Points</th><th>Status</th></tr></thead><tbody>";

    fn doc(body: &str) -> String {
        format!("{}{}</tbody></table>", HEADED, body)
    }

    #[test]
    fn test_decode_basic_rows() {
        let decoded = decode(&doc(
            "<tr><td>1</td><td>Alpha</td><td>50</td><td>🟩🟩🟥🟥</td></tr>\
             <tr><td>2</td><td>Beta</td><td>40</td><td>✅❌❌❌</td></tr>",
        ))
        .unwrap();

        assert!(decoded.warnings.is_empty());
        assert_eq!(decoded.rows.len(), 2);
        assert_eq!(decoded.rows[0].team, "Alpha");
        assert_eq!(decoded.rows[0].status.to_display(), "✅✅❌❌");
        assert_eq!(decoded.rows[1].points, 40);
        assert!(decoded.skeleton.has_header());
    }

    #[test]
    fn test_first_body_row_kept_when_thead_present() {
        let decoded = decode(&doc("<tr><td>7</td><td>Solo</td><td>1</td><td>🟥🟥🟥🟥</td></tr>")).unwrap();
        assert_eq!(decoded.rows.len(), 1);
        assert_eq!(decoded.rows[0].rank, 7);
    }

    #[test]
    fn test_no_table() {
        assert_eq!(decode("<html><body><p>nothing</p></body></html>"), Err(LoadError::NoTable));
    }

    #[test]
    fn test_bad_header_first_label() {
        let src = "<table><thead><tr><th>Pos</th><th>Team</th><th>Points</th><th>Status</th></tr></thead></table>";
        match decode(src) {
            Err(LoadError::BadHeader { found }) => assert_eq!(found[0], "Pos"),
            other => panic!("expected BadHeader, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_header_too_few_labels() {
        let src = "<table><thead><tr><th>#</th><th>Team</th><th>Points</th></tr></thead></table>";
        assert!(matches!(decode(src), Err(LoadError::BadHeader { .. })));
    }

    #[test]
    fn test_legacy_rank_header_accepted() {
        let src = "<table><thead><tr><th>Rank</th><th>Team</th><th>Points</th><th>Status</th></tr></thead>\
                   <tbody><tr><td>1</td><td>A</td><td>3</td><td>🟩🟩🟩🟩</td></tr></tbody></table>";
        let decoded = decode(src).unwrap();
        assert_eq!(decoded.rows.len(), 1);
    }

    #[test]
    fn test_header_row_in_body_is_skipped() {
        let src = "<table><tr><th>#</th><th>Team</th><th>Points</th><th>Status</th></tr>\
                   <tr><td>1</td><td>A</td><td>3</td><td>🟩🟩🟩🟩</td></tr>\
                   <tr><td>2</td><td>B</td><td>2</td><td>🟩🟩🟩🟥</td></tr></table>";
        let decoded = decode(src).unwrap();
        assert_eq!(decoded.rows.len(), 2);
        assert!(!decoded.skeleton.has_header());
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn test_too_few_columns_skipped_with_row_number() {
        let decoded = decode(&doc(
            "<tr><td>1</td><td>A</td><td>3</td><td>🟩🟩🟩🟩</td></tr>\
             <tr><td>2</td><td>B</td><td>2</td></tr>",
        ))
        .unwrap();
        assert_eq!(decoded.rows.len(), 1);
        assert_eq!(decoded.warnings, vec![RowWarning::TooFewColumns(2)]);
    }

    #[test]
    fn test_non_numeric_skipped() {
        let decoded = decode(&doc(
            "<tr><td>one</td><td>A</td><td>3</td><td>🟩🟩🟩🟩</td></tr>\
             <tr><td>2</td><td>B</td><td>lots</td><td>🟩🟩🟩🟩</td></tr>\
             <tr><td>3</td><td>C</td><td>-4</td><td>🟩🟩🟩🟩</td></tr>",
        ))
        .unwrap();
        assert_eq!(decoded.rows.len(), 1);
        assert_eq!(decoded.rows[0].points, -4);
        assert_eq!(
            decoded.warnings,
            vec![RowWarning::NonNumeric(1), RowWarning::NonNumeric(2)]
        );
    }

    #[test]
    fn test_status_repair_emits_warning() {
        let decoded = decode(&doc(
            "<tr><td>1</td><td>A</td><td>3</td><td>🟩🟩</td></tr>\
             <tr><td>2</td><td>B</td><td>2</td><td>🟩🟩🟩🟩🟩🟩</td></tr>",
        ))
        .unwrap();

        assert_eq!(decoded.rows.len(), 2);
        assert_eq!(decoded.rows[0].status.to_display(), "✅✅❌❌");
        assert_eq!(decoded.rows[1].status.to_display(), "✅✅✅✅");
        assert_eq!(
            decoded.warnings,
            vec![
                RowWarning::StatusLengthMismatch { row: 1, found: 2 },
                RowWarning::StatusLengthMismatch { row: 2, found: 6 },
            ]
        );
    }

    #[test]
    fn test_duplicate_rank_and_empty_team_skipped() {
        let decoded = decode(&doc(
            "<tr><td>1</td><td>A</td><td>3</td><td>🟩🟩🟩🟩</td></tr>\
             <tr><td>1</td><td>Again</td><td>2</td><td>🟩🟩🟩🟩</td></tr>\
             <tr><td>2</td><td>  </td><td>2</td><td>🟩🟩🟩🟩</td></tr>",
        ))
        .unwrap();

        assert_eq!(decoded.rows.len(), 1);
        assert_eq!(
            decoded.warnings,
            vec![
                RowWarning::DuplicateRank { row: 2, rank: 1 },
                RowWarning::EmptyTeam(3),
            ]
        );
    }

    #[test]
    fn test_cell_text_is_cleaned() {
        let decoded = decode(&doc(
            "<tr><td> 4 </td><td> <b>Team</b> &amp; Co\n</td><td>+12</td><td>🟩 🟥 🟩 🟥</td></tr>",
        ))
        .unwrap();
        assert_eq!(decoded.rows[0].rank, 4);
        assert_eq!(decoded.rows[0].team, "Team & Co");
        assert_eq!(decoded.rows[0].points, 12);
        assert_eq!(decoded.rows[0].status.to_display(), "✅❌✅❌");
    }

    #[test]
    fn test_team_keeps_internal_spacing() {
        let decoded = decode(&doc(
            "<tr><td>1</td><td>  Red   Bull\u{A0}</td><td>3</td><td>🟩🟩🟩🟩</td></tr>",
        ))
        .unwrap();
        assert_eq!(decoded.rows[0].team, "Red   Bull");
    }

    #[test]
    fn test_header_labels_are_collapsed() {
        let src = "<table><thead><tr><th>\n #\n</th><th>Team</th><th>Points</th><th>Sta&#116;us</th></tr></thead></table>";
        assert!(decode(src).is_ok());
    }

    #[test]
    fn test_unclosed_cells_and_rows() {
        let decoded = decode(&doc("<tr><td>1<td>A<td>3<td>🟩🟩🟩🟩<tr><td>2<td>B<td>1<td>🟥🟥🟥🟥")).unwrap();
        assert_eq!(decoded.rows.len(), 2);
        assert_eq!(decoded.rows[1].team, "B");
    }

    #[test]
    fn test_skeleton_captures_surroundings() {
        let src = format!("<body><h1>Title</h1>{}<p>after</p></body>", doc(""));
        let decoded = decode(&src).unwrap();
        assert_eq!(decoded.skeleton.before_table, "<body><h1>Title</h1>");
        assert_eq!(decoded.skeleton.after_table, "<p>after</p></body>");
        assert_eq!(decoded.skeleton.table_open(), "<table>");
    }
}
