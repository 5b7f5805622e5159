//! Standings rows and their rendered form

use super::status::Status;

/// Header labels, in column order
pub const COLUMN_LABELS: [&str; 4] = ["#", "Team", "Points", "Status"];

/// Older documents label the first column `Rank` instead of `#`.
pub const LEGACY_RANK_LABEL: &str = "Rank";

/// One standings entry.
///
/// `rank` doubles as the primary key and is unique within a row set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub rank: i64,
    pub team: String,
    pub points: i64,
    pub status: Status,
}

impl Row {
    pub fn new(rank: i64, team: impl Into<String>, points: i64, status: Status) -> Self {
        Self {
            rank,
            team: team.into(),
            points,
            status,
        }
    }

    /// Renders the row the way the table view shows it.
    pub fn to_display_row(&self) -> DisplayRow {
        DisplayRow {
            cells: [
                self.rank.to_string(),
                self.team.clone(),
                self.points.to_string(),
                self.status.to_display(),
            ],
        }
    }
}

/// A row as rendered text, one string per column.
///
/// This is what the presentation layer holds; values are not guaranteed to
/// be well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub cells: [String; 4],
}

impl DisplayRow {
    pub fn new(
        rank: impl Into<String>,
        team: impl Into<String>,
        points: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            cells: [rank.into(), team.into(), points.into(), status.into()],
        }
    }
}
