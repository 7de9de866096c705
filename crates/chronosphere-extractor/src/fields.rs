//! Field extraction from one raw article

use crate::error::FieldError;
use chronosphere_domain::traits::{MarkupDocument, MarkupParser};
use chronosphere_domain::{ExtractedArticle, RawArticle};
use tracing::debug;

/// Turns raw articles into extracted articles
///
/// Articles without a non-empty history section or without any coordinate
/// pair are filtered out. The two descriptions are best effort.
#[derive(Debug, Clone)]
pub struct FieldExtractor<P: MarkupParser> {
    parser: P,
    history_heading: String,
    include_id: bool,
}

impl<P: MarkupParser> FieldExtractor<P> {
    /// Create an extractor that reads the `History` section and keeps ids
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            history_heading: "History".to_string(),
            include_id: true,
        }
    }

    /// Use a different heading for the history section
    pub fn with_history_heading(mut self, heading: impl Into<String>) -> Self {
        self.history_heading = heading.into();
        self
    }

    /// Whether extracted articles carry the source id
    pub fn with_include_id(mut self, include_id: bool) -> Self {
        self.include_id = include_id;
        self
    }

    /// Extract one article, or `None` if it is ineligible
    pub fn extract(&self, article: &RawArticle) -> Option<ExtractedArticle> {
        let doc = self.parser.parse(&article.revision_text);

        let history = match doc.section(&self.history_heading) {
            Some(section) if !section.text().trim().is_empty() => section.text().to_string(),
            _ => {
                debug!("Skipping '{}': no {} section", article.title, self.history_heading);
                return None;
            }
        };

        let Some(coordinates) = doc.coordinates().last().copied() else {
            debug!("Skipping '{}': no coordinates", article.title);
            return None;
        };

        let short_description = derive_short_description(&doc)
            .map_err(|e| debug!("No short description for '{}': {}", article.title, e))
            .ok();
        let description = derive_description(&doc)
            .map_err(|e| debug!("No description for '{}': {}", article.title, e))
            .ok();

        Some(ExtractedArticle {
            title: article.title.clone(),
            id: article.id.clone().filter(|_| self.include_id),
            history,
            coordinates,
            short_description,
            description,
            events: None,
        })
    }

    /// Extract every eligible article, preserving input order
    pub fn extract_all(&self, articles: &[RawArticle]) -> Vec<ExtractedArticle> {
        articles.iter().filter_map(|a| self.extract(a)).collect()
    }
}

fn derive_short_description<D: MarkupDocument>(doc: &D) -> Result<String, FieldError> {
    let summary = doc
        .summary()
        .map_err(|e| FieldError::Markup(e.to_string()))?;
    let summary = summary.trim();
    if summary.is_empty() {
        return Err(FieldError::Empty);
    }
    Ok(summary.to_string())
}

fn derive_description<D: MarkupDocument>(doc: &D) -> Result<String, FieldError> {
    doc.paragraphs()
        .map_err(|e| FieldError::Markup(e.to_string()))?
        .iter()
        .map(|p| p.text().trim())
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(FieldError::Empty)
}
