//! Save pipeline
//!
//! Debounced, backed-up persistence of the row store.
//!
//! # Flow
//!
//! ```text
//! mutation ─► SaveScheduler::request_save ─(idle delay)─► take_due
//!                                                          │
//!                      DocumentPersister::perform_save ◄───┘
//!                        backup ─► canonicalize ─► encode ─► tmp+rename
//! ```
//!
//! The scheduler holds no timer handle of its own; the owning event loop
//! waits on its deadline. Saves therefore never overlap and never race an
//! edit.

mod checksum;
mod errors;
mod scheduler;
mod writer;

pub use checksum::compute_checksum;
pub use errors::{SaveError, SaveResult};
pub use scheduler::{SaveScheduler, DEFAULT_IDLE_DELAY};
pub use writer::{BackupOutcome, DocumentPersister, SaveReport};
