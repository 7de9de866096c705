//! Per-shard processing

use crate::error::ExtractError;
use crate::fields::FieldExtractor;
use crate::source::{decode_shard, ArticleSource};
use chronosphere_domain::traits::MarkupParser;
use chronosphere_domain::ExtractedArticle;
use std::sync::Arc;
use tracing::debug;

/// Loads one shard and extracts its eligible articles
///
/// File reads are awaited on the runtime. Decoding and markup parsing are
/// CPU bound and run on the blocking pool so sibling shards keep making
/// progress.
pub struct ShardProcessor<P: MarkupParser> {
    source: ArticleSource,
    extractor: Arc<FieldExtractor<P>>,
}

impl<P: MarkupParser> Clone for ShardProcessor<P> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            extractor: Arc::clone(&self.extractor),
        }
    }
}

impl<P> ShardProcessor<P>
where
    P: MarkupParser + 'static,
{
    /// Create a processor over a source and a field extractor
    pub fn new(source: ArticleSource, extractor: FieldExtractor<P>) -> Self {
        Self {
            source,
            extractor: Arc::new(extractor),
        }
    }

    /// The shard source
    pub fn source(&self) -> &ArticleSource {
        &self.source
    }

    /// Extract the eligible articles of one shard, in input order
    pub async fn process(&self, index: usize) -> Result<Vec<ExtractedArticle>, ExtractError> {
        let bytes = self.source.read(index).await?;
        let path = self.source.shard_path(index);
        let extractor = Arc::clone(&self.extractor);

        let task_path = path.clone();
        let (total, articles) = tokio::task::spawn_blocking(move || {
            let raw = decode_shard(&task_path, &bytes)?;
            let articles = extractor.extract_all(&raw);
            Ok::<_, ExtractError>((raw.len(), articles))
        })
        .await
        .map_err(|e| ExtractError::ShardRead {
            path,
            reason: format!("extraction task failed: {}", e),
        })??;

        debug!(
            "Shard {}: {} of {} articles eligible",
            index,
            articles.len(),
            total
        );
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::wikitext::WikitextParser;
    use tempfile::TempDir;

    fn processor(dir: &TempDir) -> ShardProcessor<WikitextParser> {
        let config = ExtractorConfig {
            input_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        ShardProcessor::new(
            ArticleSource::new(&config),
            FieldExtractor::new(WikitextParser::new()),
        )
    }

    #[tokio::test]
    async fn test_process_filters_ineligible() {
        let dir = TempDir::new().unwrap();
        let shard = serde_json::json!([
            { "title": "Kept", "revision": { "text": "{{coord|1|2}}\n== History ==\nFounded 1900." } },
            { "title": "NoCoords", "revision": { "text": "== History ==\nFounded 1900." } },
            { "title": "AlsoKept", "revision": { "text": "{{coord|3|4}}\n== History ==\nBuilt 1950." } }
        ]);
        std::fs::write(dir.path().join("0_wiki_part.json"), shard.to_string()).unwrap();

        let articles = processor(&dir).process(0).await.unwrap();
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Kept", "AlsoKept"]);
    }

    #[tokio::test]
    async fn test_corrupt_shard_propagates() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("0_wiki_part.json"), "[{").unwrap();

        let result = processor(&dir).process(0).await;
        assert!(matches!(result, Err(ExtractError::ShardRead { .. })));
    }
}
