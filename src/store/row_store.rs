//! Canonical in-memory row list
//!
//! The store owns the only authoritative copy of the rows. The document on
//! disk is derived from it on every save, never the other way round (except
//! at startup).

use super::errors::{ValidationError, ValidationResult};
use crate::sort::{RowSorter, SortResult, SortState};
use crate::standings::{DisplayRow, Row, Status};

/// Ordered set of rows with unique ranks.
///
/// Order is the current display order; it changes with sorting and is reset
/// to ascending rank by [`RowStore::canonicalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowStore {
    rows: Vec<Row>,
}

impl RowStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from already-decoded rows.
    ///
    /// # Errors
    ///
    /// `ValidationError::DuplicateRank` if two rows share a rank, or
    /// `ValidationError::EmptyTeam` if a team is blank.
    pub fn from_rows(rows: Vec<Row>) -> ValidationResult<Self> {
        let mut store = Self::new();
        for row in rows {
            store.insert(row)?;
        }
        Ok(store)
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a row by rank.
    pub fn get(&self, rank: i64) -> Option<&Row> {
        self.rows.iter().find(|row| row.rank == rank)
    }

    pub fn contains(&self, rank: i64) -> bool {
        self.get(rank).is_some()
    }

    /// Ranks in display order.
    pub fn ranks(&self) -> Vec<i64> {
        self.rows.iter().map(|row| row.rank).collect()
    }

    /// Validates and appends a row from raw form input.
    ///
    /// Checks run in a fixed order: team, rank, points, uniqueness. The first
    /// failure is returned and nothing changes.
    pub fn add(
        &mut self,
        rank: &str,
        team: &str,
        points: &str,
        status: Status,
    ) -> ValidationResult<&Row> {
        let team = team.trim();
        if team.is_empty() {
            return Err(ValidationError::EmptyTeam);
        }

        let rank_text = rank.trim();
        let rank = rank_text
            .parse::<i64>()
            .map_err(|_| ValidationError::NonNumericRank(rank_text.to_string()))?;

        let points_text = points.trim();
        let points = points_text
            .parse::<i64>()
            .map_err(|_| ValidationError::NonNumericPoints(points_text.to_string()))?;

        self.insert(Row::new(rank, team, points, status))
    }

    /// Appends a typed row.
    ///
    /// # Errors
    ///
    /// `EmptyTeam` for a blank team, `DuplicateRank` if the rank exists.
    pub fn insert(&mut self, row: Row) -> ValidationResult<&Row> {
        if row.team.trim().is_empty() {
            return Err(ValidationError::EmptyTeam);
        }
        if self.contains(row.rank) {
            return Err(ValidationError::DuplicateRank(row.rank));
        }
        self.rows.push(row);
        Ok(&self.rows[self.rows.len() - 1])
    }

    /// Replaces only the status of the row with `rank`.
    pub fn update_status(&mut self, rank: i64, status: Status) -> ValidationResult<&Row> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.rank == rank)
            .ok_or(ValidationError::NotFound(rank))?;
        row.status = status;
        Ok(row)
    }

    /// Removes and returns the row with `rank`.
    pub fn delete(&mut self, rank: i64) -> ValidationResult<Row> {
        let index = self
            .rows
            .iter()
            .position(|row| row.rank == rank)
            .ok_or(ValidationError::NotFound(rank))?;
        Ok(self.rows.remove(index))
    }

    /// Removes every row and returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.rows.len();
        self.rows.clear();
        removed
    }

    /// Reorders rows for display.
    pub fn sort(&mut self, state: SortState) -> SortResult<()> {
        RowSorter::sort_by_state(&mut self.rows, state)
    }

    /// Puts rows back in ascending rank order (the persisted order).
    pub fn canonicalize(&mut self) {
        self.rows.sort_by_key(|row| row.rank);
    }

    /// Rows rendered for the table view, in display order.
    pub fn display_rows(&self) -> Vec<DisplayRow> {
        self.rows.iter().map(Row::to_display_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{SortColumn, SortDirection};

    fn store() -> RowStore {
        RowStore::from_rows(vec![
            Row::new(1, "Alpha", 50, Status::new([true, true, false, false])),
            Row::new(2, "Beta", 40, Status::new([true, false, false, false])),
        ])
        .unwrap()
    }

    #[test]
    fn test_add_success() {
        let mut store = store();
        let added = store.add(" 3 ", "  Gamma ", "30", Status::eliminated()).unwrap();

        assert_eq!(added.rank, 3);
        assert_eq!(added.team, "Gamma");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_add_validation_order() {
        let mut store = store();

        assert_eq!(
            store.add("x", " ", "y", Status::eliminated()),
            Err(ValidationError::EmptyTeam)
        );
        assert_eq!(
            store.add("x", "T", "y", Status::eliminated()),
            Err(ValidationError::NonNumericRank("x".into()))
        );
        assert_eq!(
            store.add("9", "T", "y", Status::eliminated()),
            Err(ValidationError::NonNumericPoints("y".into()))
        );
        assert_eq!(
            store.add("1", "T", "5", Status::eliminated()),
            Err(ValidationError::DuplicateRank(1))
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_rejects_every_existing_rank() {
        let mut store = RowStore::new();
        for rank in -3..=3 {
            store
                .add(&rank.to_string(), "T", "0", Status::eliminated())
                .unwrap();
        }
        let before = store.clone();

        for rank in -3..=3 {
            assert_eq!(
                store.add(&rank.to_string(), "Other", "1", Status::eliminated()),
                Err(ValidationError::DuplicateRank(rank))
            );
        }
        assert_eq!(store, before);
    }

    #[test]
    fn test_from_rows_rejects_duplicates() {
        let rows = vec![
            Row::new(1, "A", 0, Status::eliminated()),
            Row::new(1, "B", 0, Status::eliminated()),
        ];
        assert_eq!(RowStore::from_rows(rows), Err(ValidationError::DuplicateRank(1)));
    }

    #[test]
    fn test_update_status_only_touches_status() {
        let mut store = store();
        let status = Status::new([false, false, false, true]);

        let updated = store.update_status(2, status).unwrap().clone();

        assert_eq!(updated, Row::new(2, "Beta", 40, status));
        assert_eq!(
            store.update_status(9, status),
            Err(ValidationError::NotFound(9))
        );
    }

    #[test]
    fn test_delete_and_clear() {
        let mut store = store();

        let removed = store.delete(1).unwrap();
        assert_eq!(removed.team, "Alpha");
        assert_eq!(store.ranks(), vec![2]);
        assert_eq!(store.delete(1), Err(ValidationError::NotFound(1)));

        assert_eq!(store.clear(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_sort_then_canonicalize() {
        let mut store = store();
        store.add("3", "Gamma", "60", Status::eliminated()).unwrap();

        store
            .sort(SortState::new(SortColumn::Points, SortDirection::Desc))
            .unwrap();
        assert_eq!(store.ranks(), vec![3, 1, 2]);

        store.canonicalize();
        assert_eq!(store.ranks(), vec![1, 2, 3]);
    }
}
