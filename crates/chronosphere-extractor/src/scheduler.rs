//! Grouped batch scheduling over shard indices

use crate::config::{ExtractorConfig, OutputLayout};
use crate::error::ExtractError;
use crate::fields::FieldExtractor;
use crate::progress::{NoopProgress, Progress, ProgressReporter};
use crate::shard::ShardProcessor;
use crate::source::ArticleSource;
use chronosphere_domain::traits::MarkupParser;
use chronosphere_domain::ExtractedArticle;
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// A shard that produced no output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardFailure {
    /// Shard index
    pub index: usize,

    /// Why the shard failed
    pub reason: String,
}

/// An output file that could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    /// Output file path
    pub path: PathBuf,

    /// Underlying cause
    pub reason: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Shards in the run
    pub total_shards: usize,

    /// Shards that were read and extracted
    pub succeeded: usize,

    /// Shards that could not be read or decoded
    pub failed: Vec<ShardFailure>,

    /// Output files that could not be written
    pub write_failures: Vec<WriteFailure>,

    /// Eligible articles across all successful shards
    pub articles_extracted: usize,
}

impl RunSummary {
    /// Whether every shard was extracted and written
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.write_failures.is_empty()
    }
}

/// Split `[0, total)` into contiguous groups of at most `group_size`
///
/// A `group_size` of zero yields a single group covering every index.
///
/// # Examples
///
/// ```
/// use chronosphere_extractor::partition;
///
/// assert_eq!(partition(5, 2), vec![0..2, 2..4, 4..5]);
/// assert_eq!(partition(5, 0), vec![0..5]);
/// assert!(partition(0, 100).is_empty());
/// ```
pub fn partition(total: usize, group_size: usize) -> Vec<Range<usize>> {
    if total == 0 {
        return Vec::new();
    }
    let step = if group_size == 0 { total } else { group_size };
    (0..total)
        .step_by(step)
        .map(|start| start..(start + step).min(total))
        .collect()
}

/// Runs shard processing group by group
///
/// Every shard in a group is processed concurrently; the next group starts
/// only after the whole group has settled. A failed shard is logged and
/// recorded, never fatal. Only an unusable output directory stops a run.
pub struct BatchScheduler<P: MarkupParser> {
    processor: ShardProcessor<P>,
    config: ExtractorConfig,
    reporter: Arc<dyn ProgressReporter>,
}

impl<P> BatchScheduler<P>
where
    P: MarkupParser + 'static,
{
    /// Create a scheduler around an existing processor
    pub fn new(processor: ShardProcessor<P>, config: ExtractorConfig) -> Self {
        Self {
            processor,
            config,
            reporter: Arc::new(NoopProgress),
        }
    }

    /// Build the source, field extractor and processor from the configuration
    pub fn from_config(config: ExtractorConfig, parser: P) -> Result<Self, ExtractError> {
        config.validate().map_err(ExtractError::Config)?;

        let extractor = FieldExtractor::new(parser)
            .with_history_heading(config.history_heading.clone())
            .with_include_id(config.include_id);
        let processor = ShardProcessor::new(ArticleSource::new(&config), extractor);
        Ok(Self::new(processor, config))
    }

    /// Report progress to the given reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Process shards `[0, total)`, counting the input files if `total` is `None`
    pub async fn run(&self, total: Option<usize>) -> Result<RunSummary, ExtractError> {
        let total = match total {
            Some(total) => total,
            None => self.processor.source().count_shards().await?,
        };

        let mut summary = RunSummary {
            total_shards: total,
            ..Default::default()
        };
        if total == 0 {
            info!("No shards to process");
            return Ok(summary);
        }

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| ExtractError::OutputDirectory {
                path: self.config.output_dir.clone(),
                reason: e.to_string(),
            })?;

        let groups = partition(total, self.config.group_size);
        info!(
            "Processing {} shards in {} groups from {}",
            total,
            groups.len(),
            self.config.input_dir.display()
        );
        self.reporter.start(total);

        let mut combined = Vec::new();
        for (group_number, group) in groups.iter().enumerate() {
            let mut results = self.run_group(group.clone()).await;

            for index in group.clone() {
                let articles = match results.remove(&index) {
                    Some(Ok(articles)) => articles,
                    Some(Err(e)) => {
                        warn!("Shard {} failed: {}", index, e);
                        summary.failed.push(ShardFailure {
                            index,
                            reason: e.to_string(),
                        });
                        continue;
                    }
                    None => {
                        summary.failed.push(ShardFailure {
                            index,
                            reason: "extraction task did not complete".to_string(),
                        });
                        continue;
                    }
                };

                summary.succeeded += 1;
                summary.articles_extracted += articles.len();

                match self.config.layout {
                    OutputLayout::PerShard => {
                        let path = self.config.output_path(index);
                        if let Err(e) = write_json(&path, &articles, false).await {
                            error!("{}", e);
                            summary.write_failures.push(write_failure(path, e));
                        }
                    }
                    OutputLayout::Combined => combined.extend(articles),
                }
            }

            let progress = Progress {
                processed_shards: group.end,
                total_shards: total,
            };
            info!(
                "Group {}/{} settled: {}/{} shards processed",
                group_number + 1,
                groups.len(),
                progress.processed_shards,
                total
            );
            self.reporter.advance(progress);
        }

        if self.config.layout == OutputLayout::Combined {
            let path = self.config.combined_path();
            if let Err(e) = write_json(&path, &combined, true).await {
                error!("{}", e);
                summary.write_failures.push(write_failure(path, e));
            }
        }

        self.reporter.finish(Progress {
            processed_shards: total,
            total_shards: total,
        });
        info!(
            "Run complete: {}/{} shards succeeded, {} articles extracted",
            summary.succeeded, total, summary.articles_extracted
        );
        Ok(summary)
    }

    /// Process one group concurrently and wait for every shard to settle
    async fn run_group(
        &self,
        group: Range<usize>,
    ) -> BTreeMap<usize, Result<Vec<ExtractedArticle>, ExtractError>> {
        let mut set = JoinSet::new();
        for index in group {
            let processor = self.processor.clone();
            set.spawn(async move { (index, processor.process(index).await) });
        }

        let mut results = BTreeMap::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    results.insert(index, result);
                }
                Err(e) => error!("Shard task aborted: {}", e),
            }
        }
        results
    }
}

async fn write_json(
    path: &Path,
    articles: &[ExtractedArticle],
    pretty: bool,
) -> Result<(), ExtractError> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(articles)
    } else {
        serde_json::to_vec(articles)
    };
    let bytes = encoded.map_err(|e| ExtractError::ShardWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| ExtractError::ShardWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn write_failure(path: PathBuf, error: ExtractError) -> WriteFailure {
    let reason = match error {
        ExtractError::ShardWrite { reason, .. } => reason,
        other => other.to_string(),
    };
    WriteFailure { path, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_groups_of_100() {
        let groups = partition(250, 100);
        assert_eq!(groups, vec![0..100, 100..200, 200..250]);
    }

    #[test]
    fn test_partition_exact_multiple() {
        assert_eq!(partition(200, 100), vec![0..100, 100..200]);
    }

    #[test]
    fn test_partition_unbounded() {
        assert_eq!(partition(37, 0), vec![0..37]);
    }

    #[test]
    fn test_partition_group_larger_than_total() {
        assert_eq!(partition(3, 100), vec![0..3]);
    }

    #[test]
    fn test_summary_is_clean() {
        let mut summary = RunSummary::default();
        assert!(summary.is_clean());
        summary.failed.push(ShardFailure {
            index: 4,
            reason: "missing".to_string(),
        });
        assert!(!summary.is_clean());
    }
}
