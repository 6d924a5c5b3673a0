//! CLI library modules for the `accord` binary.
//!
//! Argument parsing, command implementations, logging and terminal progress
//! live here so they can be tested without spawning the binary.

pub mod commands;
pub mod output;
pub mod parser;
pub mod progress;
pub mod utils;

pub use parser::{Cli, Commands, OutputFormat};
