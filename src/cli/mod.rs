//! Command-line interface for tunedeck.
//!
//! This module provides CLI commands for browsing, editing and playing the
//! song library.

mod commands;

pub use commands::{Cli, Commands, run_command};
