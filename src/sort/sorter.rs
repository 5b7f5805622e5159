//! Row sorting for the table view
//!
//! Sorts by a single column, stably and deterministically. Equal keys keep
//! their relative order in both directions.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{SortError, SortResult};
use crate::standings::{DisplayRow, Row, COLUMN_LABELS, LEGACY_RANK_LABEL};

/// Sortable table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortColumn {
    Rank,
    Team,
    Points,
    Status,
}

impl SortColumn {
    /// All columns in table order
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Rank,
        SortColumn::Team,
        SortColumn::Points,
        SortColumn::Status,
    ];

    /// Header label for this column
    pub fn label(&self) -> &'static str {
        COLUMN_LABELS[self.index()]
    }

    /// Position of this column in a row
    pub fn index(&self) -> usize {
        match self {
            SortColumn::Rank => 0,
            SortColumn::Team => 1,
            SortColumn::Points => 2,
            SortColumn::Status => 3,
        }
    }

    /// Rank and Points compare as integers
    pub fn is_numeric(&self) -> bool {
        matches!(self, SortColumn::Rank | SortColumn::Points)
    }

    /// Resolves a header label (`#`, `Rank`, `Team`, `Points`, `Status`),
    /// ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// `SortError::UnknownColumn` for any other label.
    pub fn from_label(label: &str) -> SortResult<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case(LEGACY_RANK_LABEL) {
            return Ok(SortColumn::Rank);
        }
        Self::ALL
            .into_iter()
            .find(|column| column.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| SortError::UnknownColumn(label.to_string()))
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortColumn {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

impl TryFrom<String> for SortColumn {
    type Error = SortError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value)
    }
}

impl From<SortColumn> for String {
    fn from(column: SortColumn) -> Self {
        column.label().to_string()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn is_descending(&self) -> bool {
        *self == SortDirection::Desc
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Header arrow shown next to the active column
    pub fn arrow(&self) -> char {
        match self {
            SortDirection::Asc => '▲',
            SortDirection::Desc => '▼',
        }
    }
}

/// Last-used sort column and direction.
///
/// The editor re-applies this after every mutation so the table stays
/// sorted until the user picks another column or reverses direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header click: the active column flips direction, any other column
    /// becomes active in ascending order.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = self.direction.reversed();
        } else {
            self.column = column;
            self.direction = SortDirection::Asc;
        }
    }

    /// Header text for `column`, with an arrow when it is the active one.
    pub fn heading(&self, column: SortColumn) -> String {
        if self.column == column {
            format!("{} {}", column.label(), self.direction.arrow())
        } else {
            column.label().to_string()
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortColumn::Rank, SortDirection::Asc)
    }
}

/// Value of one column as seen by the sorter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortValue<'a> {
    Number(i64),
    Text(Cow<'a, str>),
}

/// Anything that can be sorted by table column.
pub trait SortRecord {
    fn sort_value(&self, column: SortColumn) -> SortValue<'_>;
}

impl SortRecord for Row {
    fn sort_value(&self, column: SortColumn) -> SortValue<'_> {
        match column {
            SortColumn::Rank => SortValue::Number(self.rank),
            SortColumn::Team => SortValue::Text(Cow::Borrowed(&self.team)),
            SortColumn::Points => SortValue::Number(self.points),
            SortColumn::Status => SortValue::Text(Cow::Owned(self.status.to_display())),
        }
    }
}

impl SortRecord for DisplayRow {
    fn sort_value(&self, column: SortColumn) -> SortValue<'_> {
        SortValue::Text(Cow::Borrowed(&self.cells[column.index()]))
    }
}

/// Comparable key extracted once per record
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(i64),
    Folded(String),
}

/// Sorts records by table column
pub struct RowSorter;

impl RowSorter {
    /// Sorts records in place.
    ///
    /// Numeric columns compare as integers; text columns compare
    /// case-insensitively. The sort is stable in both directions.
    ///
    /// # Errors
    ///
    /// `SortError::NonNumericValue` if a numeric column holds text that does
    /// not parse as an integer. Keys are checked before anything moves, so on
    /// error the records are left in their original order.
    pub fn sort<R: SortRecord>(
        records: &mut Vec<R>,
        column: SortColumn,
        direction: SortDirection,
    ) -> SortResult<()> {
        let keys = records
            .iter()
            .map(|record| Self::key_for(record, column))
            .collect::<SortResult<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..records.len()).collect();
        order.sort_by(|a, b| {
            let ordering = keys[*a].cmp(&keys[*b]);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let mut slots: Vec<Option<R>> = records.drain(..).map(Some).collect();
        records.extend(order.into_iter().filter_map(|index| slots[index].take()));
        Ok(())
    }

    /// Sorts by a remembered [`SortState`].
    pub fn sort_by_state<R: SortRecord>(records: &mut Vec<R>, state: SortState) -> SortResult<()> {
        Self::sort(records, state.column, state.direction)
    }

    fn key_for<R: SortRecord>(record: &R, column: SortColumn) -> SortResult<SortKey> {
        match (record.sort_value(column), column.is_numeric()) {
            (SortValue::Number(n), _) => Ok(SortKey::Number(n)),
            (SortValue::Text(text), true) => text
                .trim()
                .parse::<i64>()
                .map(SortKey::Number)
                .map_err(|_| SortError::NonNumericValue {
                    column,
                    value: text.into_owned(),
                }),
            (SortValue::Text(text), false) => Ok(SortKey::Folded(text.to_lowercase())),
        }
    }

    /// Compares two records on one column, for callers that need a single
    /// ordering decision.
    pub fn compare<R: SortRecord>(a: &R, b: &R, column: SortColumn) -> SortResult<Ordering> {
        Ok(Self::key_for(a, column)?.cmp(&Self::key_for(b, column)?))
    }
}
