//! Document skeleton
//!
//! The parts of a loaded document that survive a save: everything around
//! the table, the table's opening tag, and the table's own markup around
//! its body (caption, colgroup, `<thead>`, `<tfoot>` and anything else that
//! is not a data row). The body is never stored here; it is rendered fresh
//! from the rows on every encode.

/// Immutable frame a table body is rendered into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSkeleton {
    /// Markup preceding the `<table>` tag
    pub(super) before_table: String,
    /// The `<table ...>` opening tag, verbatim
    pub(super) table_open: String,
    /// Table markup ahead of the body, trimmed
    pub(super) table_head: String,
    /// Table markup after the body, trimmed
    pub(super) table_tail: String,
    /// Whether `table_head` or `table_tail` holds a `<thead>`
    pub(super) has_header: bool,
    /// Markup following `</table>`
    pub(super) after_table: String,
}

impl DocumentSkeleton {
    /// Minimal document: a titled page holding a headed, empty table.
    pub fn empty() -> Self {
        Self {
            before_table: "<html>\n<head>\n<title>Standings</title>\n</head>\n<body>\n".to_string(),
            table_open: "<table>".to_string(),
            table_head: String::new(),
            table_tail: String::new(),
            has_header: false,
            after_table: "\n</body>\n</html>\n".to_string(),
        }
    }

    /// Whether the source document had its own header section.
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// The opening table tag carried over from the source.
    pub fn table_open(&self) -> &str {
        &self.table_open
    }
}

impl Default for DocumentSkeleton {
    fn default() -> Self {
        Self::empty()
    }
}
