//! Shard loading
//!
//! A shard is one JSON document holding an array of raw articles. Decoding is
//! all or nothing: a shard that fails to decode yields no articles at all.

use crate::config::{shard_path, ExtractorConfig};
use crate::error::ExtractError;
use chronosphere_domain::RawArticle;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads raw articles from the shard files of one input directory
#[derive(Debug, Clone)]
pub struct ArticleSource {
    input_dir: PathBuf,
    file_pattern: String,
}

impl ArticleSource {
    /// Create a source for the configured input directory and file pattern
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            input_dir: config.input_dir.clone(),
            file_pattern: config.input_file_pattern.clone(),
        }
    }

    /// Path of the shard file with the given index
    pub fn shard_path(&self, index: usize) -> PathBuf {
        shard_path(&self.input_dir, &self.file_pattern, index)
    }

    /// Read the raw bytes of one shard
    pub async fn read(&self, index: usize) -> Result<Vec<u8>, ExtractError> {
        let path = self.shard_path(index);
        tokio::fs::read(&path)
            .await
            .map_err(|e| ExtractError::ShardRead {
                path,
                reason: e.to_string(),
            })
    }

    /// Load and decode one shard
    pub async fn load(&self, index: usize) -> Result<Vec<RawArticle>, ExtractError> {
        let bytes = self.read(index).await?;
        decode_shard(&self.shard_path(index), &bytes)
    }

    /// Count the regular files in the input directory
    ///
    /// Subdirectories are ignored. An unreadable directory is an environment
    /// failure, not a shard failure.
    pub async fn count_shards(&self) -> Result<usize, ExtractError> {
        let dir_error = |e: std::io::Error| ExtractError::InputDirectory {
            path: self.input_dir.clone(),
            reason: e.to_string(),
        };

        let mut entries = tokio::fs::read_dir(&self.input_dir).await.map_err(dir_error)?;
        let mut count = 0;
        while let Some(entry) = entries.next_entry().await.map_err(dir_error)? {
            if entry.file_type().await.map_err(dir_error)?.is_file() {
                count += 1;
            }
        }

        debug!("Counted {} shard files in {}", count, self.input_dir.display());
        Ok(count)
    }
}

/// Decode a shard's bytes into raw articles
pub fn decode_shard(path: &Path, bytes: &[u8]) -> Result<Vec<RawArticle>, ExtractError> {
    serde_json::from_slice(bytes).map_err(|e| ExtractError::ShardRead {
        path: path.to_path_buf(),
        reason: format!("invalid shard JSON: {}", e),
    })
}
