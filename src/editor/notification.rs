//! Editor to presentation notifications

use std::fmt;

use crate::codec::RowWarning;
use crate::observability::Severity;
use crate::standings::DisplayRow;

/// Status-line message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Row list changed; re-render everything, in this order
    RowsChanged(Vec<DisplayRow>),
    /// Selected row changed (`None` clears the selection and edit form)
    SelectionChanged(Option<i64>),
    /// Outcome of an operation
    Status(Notice),
    /// A row was skipped or repaired while loading
    LoadWarning(RowWarning),
}
