//! Error types for the extraction pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting shards
///
/// `ShardRead` and `ShardWrite` are local to one shard: the scheduler logs
/// them and keeps going. The directory variants are environment failures
/// that stop a run.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Shard file missing, unreadable, or not a JSON array of articles
    #[error("Failed to read shard {path}: {reason}")]
    ShardRead {
        /// Shard file path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Output file could not be written
    #[error("Failed to write {path}: {reason}")]
    ShardWrite {
        /// Output file path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Input directory could not be listed
    #[error("Cannot read input directory {path}: {reason}")]
    InputDirectory {
        /// Directory path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Output directory could not be created
    #[error("Cannot create output directory {path}: {reason}")]
    OutputDirectory {
        /// Directory path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure to derive one optional field of an article
///
/// Never escapes the field extractor: the field is left unset instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The markup capability failed to derive the value
    #[error("markup derivation failed: {0}")]
    Markup(String),

    /// The derivation succeeded but produced nothing
    #[error("derived value is empty")]
    Empty,
}
