//! standings - editor for a tournament standings HTML table
//!
//! The document on disk is a single HTML `<table>` of (#, Team, Points,
//! Status) rows. The editor loads it, validates every change, and writes it
//! back after a short idle period, keeping a backup of the previous version.

pub mod cli;
pub mod codec;
pub mod editor;
pub mod observability;
pub mod persist;
pub mod sort;
pub mod standings;
pub mod store;
