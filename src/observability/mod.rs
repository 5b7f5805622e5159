//! Observability for the standings editor
//!
//! Provides structured logging (JSON lines) over a closed set of typed
//! events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on editing or persistence
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use standings::observability::{Event, Logger};
//!
//! Logger::info(Event::SaveComplete, &[("bytes", "812")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
