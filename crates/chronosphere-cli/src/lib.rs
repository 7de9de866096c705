//! Chronosphere CLI library.
//!
//! This library provides the core functionality for the `chronosphere`
//! command-line interface: argument parsing, configuration loading, progress
//! display and the `parse` and `enrich` commands.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod progress;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use progress::BarProgress;
