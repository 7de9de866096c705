//! Loading enrichment candidates from disk

use crate::error::EnrichError;
use chronosphere_domain::EnrichmentCandidate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load candidates from a JSON file or a directory of JSON files
///
/// Each file holds an array of candidates. Directory entries are read in
/// lexicographic file-name order; non-JSON files and subdirectories are
/// ignored.
pub async fn load_corpus(path: &Path) -> Result<Vec<EnrichmentCandidate>, EnrichError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| corpus_error(path, e))?;

    if !metadata.is_dir() {
        return load_file(path).await;
    }

    let mut files = corpus_files(path).await?;
    files.sort();
    info!("Loading {} corpus files from {}", files.len(), path.display());

    let mut candidates = Vec::new();
    for file in &files {
        candidates.extend(load_file(file).await?);
    }
    Ok(candidates)
}

async fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>, EnrichError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| corpus_error(dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| corpus_error(dir, e))? {
        let path = entry.path();
        let is_file = entry
            .file_type()
            .await
            .map_err(|e| corpus_error(&path, e))?
            .is_file();
        if is_file && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(files)
}

async fn load_file(path: &Path) -> Result<Vec<EnrichmentCandidate>, EnrichError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| corpus_error(path, e))?;
    let candidates: Vec<EnrichmentCandidate> =
        serde_json::from_slice(&bytes).map_err(|e| corpus_error(path, e))?;
    debug!("Loaded {} candidates from {}", candidates.len(), path.display());
    Ok(candidates)
}

fn corpus_error(path: &Path, error: impl std::fmt::Display) -> EnrichError {
    EnrichError::CorpusRead {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}
