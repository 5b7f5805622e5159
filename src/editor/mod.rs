//! Standings editor
//!
//! Application state and intent handling on top of the store, codec,
//! sorter and save pipeline. Has no UI dependency; any front end drives it
//! through intents and reacts to [`Notification`]s.

mod config;
mod controller;
mod notification;

pub use config::{ConfigError, ConfigResult, EditorConfig};
pub use controller::StandingsEditor;
pub use notification::{Notice, Notification};
