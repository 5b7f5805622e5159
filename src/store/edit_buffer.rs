//! In-progress edit
//!
//! The form fields and status toggles the user is editing. Nothing here is
//! committed until the editor turns it into an add or a status update, so
//! toggling a slot never schedules a save.

use super::errors::{ValidationError, ValidationResult};
use crate::standings::{Row, Status};

/// Uncommitted form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    /// Raw `#` field text
    pub rank: String,
    /// Raw team field text
    pub team: String,
    /// Raw points field text
    pub points: String,
    status: Status,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills every field from a committed row.
    pub fn load(&mut self, row: &Row) {
        self.rank = row.rank.to_string();
        self.team = row.team.clone();
        self.points = row.points.to_string();
        self.status = row.status;
    }

    /// Empties the fields and sets every slot to eliminated.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Flips one status slot (0-based) and returns its new value.
    ///
    /// # Errors
    ///
    /// `ValidationError::InvalidSlot` when `slot` is not below 4.
    pub fn toggle(&mut self, slot: usize) -> ValidationResult<bool> {
        self.status
            .toggle(slot)
            .ok_or(ValidationError::InvalidSlot(slot))
    }

    pub fn status(&self) -> Status {
        self.status
    }
}
