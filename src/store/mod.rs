//! Row store
//!
//! Holds the canonical row list and the uncommitted edit buffer, and
//! enforces the row rules:
//! - ranks are unique
//! - team names are non-empty
//! - rank and points are integers
//!
//! The store does not schedule saves itself; the editor requests a save
//! after every successful mutation.

mod edit_buffer;
mod errors;
mod row_store;

pub use edit_buffer::EditBuffer;
pub use errors::{ValidationError, ValidationResult};
pub use row_store::RowStore;
