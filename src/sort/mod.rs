//! Sort engine
//!
//! Orders rows by one column for display. Sorting never triggers a save:
//! the persisted order is always ascending rank, independent of what the
//! table view shows.

mod errors;
mod sorter;

pub use errors::{SortError, SortResult};
pub use sorter::{RowSorter, SortColumn, SortDirection, SortRecord, SortState, SortValue};
