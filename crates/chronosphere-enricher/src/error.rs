//! Error types for the enrichment pass

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during enrichment
///
/// Everything except `CorpusRead` and `Config` is local to one article: the
/// driver logs it and moves on to the next candidate.
#[derive(Error, Debug)]
pub enum EnrichError {
    /// The completion service failed or returned no structured result
    #[error("Completion error: {0}")]
    Completion(String),

    /// The completion call did not finish in time
    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),

    /// The payload does not parse or does not satisfy the declared contract
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Enriched article could not be written
    #[error("Failed to write {path}: {reason}")]
    Write {
        /// Output file path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Candidate corpus could not be read
    #[error("Failed to read corpus {path}: {reason}")]
    CorpusRead {
        /// Corpus file or directory
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EnrichError {
    /// Whether the error is a completion failure, including timeouts
    pub fn is_completion(&self) -> bool {
        matches!(self, EnrichError::Completion(_) | EnrichError::Timeout(_))
    }
}
