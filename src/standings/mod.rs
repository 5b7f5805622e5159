//! Standings data model
//!
//! A row is (rank, team, points, status). Rank is the row's key and is unique
//! across a row set; status is always exactly four alive/eliminated slots.

mod row;
mod status;

pub use row::{DisplayRow, Row, COLUMN_LABELS, LEGACY_RANK_LABEL};
pub use status::{
    ParsedStatus, Status, DISPLAY_ALIVE, DISPLAY_ELIMINATED, DOCUMENT_ALIVE, DOCUMENT_ELIMINATED,
    STATUS_SLOTS,
};
