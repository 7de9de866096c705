//! Sequential enrichment over a corpus of candidates

use crate::enricher::EventEnricher;
use crate::error::EnrichError;
use chronosphere_domain::traits::CompletionProvider;
use chronosphere_domain::{EnrichmentCandidate, ExtractedArticle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// An article that could not be enriched or written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFailure {
    /// Article title
    pub title: String,

    /// Why it failed
    pub reason: String,
}

/// Outcome of an enrichment run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    /// Articles enriched and written
    pub enriched: usize,

    /// Candidates without text, or already written when resuming
    pub skipped: usize,

    /// Articles that failed
    pub failed: Vec<ArticleFailure>,

    /// Titles whose output replaced another article's file from the same run
    pub overwritten: Vec<String>,
}

/// File name for an article title
///
/// Path separators, characters rejected by common filesystems and control
/// characters become `_`. Distinct titles can share a file name; the driver
/// reports such collisions in [`EnrichmentSummary::overwritten`].
///
/// # Examples
///
/// ```
/// use chronosphere_enricher::sanitize_title;
///
/// assert_eq!(sanitize_title("Alberta"), "Alberta.json");
/// assert_eq!(sanitize_title("AC/DC: Live"), "AC_DC_ Live.json");
/// assert_eq!(sanitize_title(""), "_.json");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let mut name: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if name.is_empty() {
        name.push('_');
    }
    name.push_str(".json");
    name
}

/// Drives the enricher over candidates one at a time
///
/// Calls are never issued concurrently so the completion service's rate
/// limits are respected. One failing article never stops the run.
pub struct EnrichmentDriver<L: CompletionProvider> {
    enricher: EventEnricher<L>,
}

impl<L: CompletionProvider> EnrichmentDriver<L> {
    /// Create a driver around an enricher
    pub fn new(enricher: EventEnricher<L>) -> Self {
        Self { enricher }
    }

    /// Output path for an article title
    pub fn output_path(&self, title: &str) -> PathBuf {
        self.enricher.config().output_dir.join(sanitize_title(title))
    }

    /// Enrich every candidate in input order
    ///
    /// Only an output directory that cannot be created fails the run.
    pub async fn run(
        &self,
        candidates: Vec<EnrichmentCandidate>,
    ) -> Result<EnrichmentSummary, EnrichError> {
        let config = self.enricher.config();
        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|e| EnrichError::Write {
                path: config.output_dir.clone(),
                reason: e.to_string(),
            })?;

        info!("Enriching {} candidates", candidates.len());
        let mut summary = EnrichmentSummary::default();
        let mut first_call = true;
        let mut written: HashMap<PathBuf, String> = HashMap::new();

        for candidate in candidates {
            let title = candidate.article.title.clone();

            if !candidate.has_text() {
                debug!("Skipping '{}': no dated text", title);
                summary.skipped += 1;
                continue;
            }

            let path = self.output_path(&title);
            if config.skip_existing && tokio::fs::try_exists(&path).await.unwrap_or(false) {
                debug!("Skipping '{}': {} exists", title, path.display());
                summary.skipped += 1;
                continue;
            }

            if !first_call && !config.request_interval().is_zero() {
                tokio::time::sleep(config.request_interval()).await;
            }
            first_call = false;

            match self.enrich_one(candidate, &path).await {
                Ok(count) => {
                    info!("Enriched '{}' with {} events", title, count);
                    summary.enriched += 1;
                    if let Some(previous) = written.insert(path.clone(), title.clone()) {
                        warn!(
                            "'{}' overwrote the output of '{}' at {}",
                            title,
                            previous,
                            path.display()
                        );
                        summary.overwritten.push(title);
                    }
                }
                Err(e) => {
                    warn!("Failed to enrich '{}': {}", title, e);
                    summary.failed.push(ArticleFailure {
                        title,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Enrichment complete: {} enriched, {} skipped, {} failed",
            summary.enriched,
            summary.skipped,
            summary.failed.len()
        );
        Ok(summary)
    }

    async fn enrich_one(
        &self,
        candidate: EnrichmentCandidate,
        path: &Path,
    ) -> Result<usize, EnrichError> {
        let events = self.enricher.enrich(&candidate.dated_text).await?;
        let count = events.len();

        let article = ExtractedArticle {
            events: Some(events),
            ..candidate.article
        };
        write_article(path, &article).await?;
        Ok(count)
    }
}

async fn write_article(path: &Path, article: &ExtractedArticle) -> Result<(), EnrichError> {
    let write_error = |reason: String| EnrichError::Write {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = serde_json::to_vec_pretty(article).map_err(|e| write_error(e.to_string()))?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| write_error(e.to_string()))
}
