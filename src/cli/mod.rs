//! Command-line front end
//!
//! Provides:
//! - edit: interactive console editor with debounced auto-save
//! - show: print the standings once

mod args;
mod commands;
mod console;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{edit, load_config, run, run_command, run_console, show};
pub use console::{ConsoleCommand, ConsoleError, FormField};
pub use errors::{CliError, CliResult};
pub use io::render_table;
