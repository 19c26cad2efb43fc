//! Command-line interface
//!
//! Loads a YAML client definition and drives it from the shell: validate
//! definitions, inspect registered types, invoke single operations and
//! drain paginated lists.

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
