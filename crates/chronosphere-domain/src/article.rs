//! Article module - raw shard records and the facts extracted from them

use crate::event::Event;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One article record as it appears in an input shard file
///
/// On disk the markup lives under a nested `revision.text` field:
///
/// ```json
/// { "title": "Alberta", "id": "717", "revision": { "text": "..." } }
/// ```
///
/// The `id` may be written as a string or a number; it is normalized to a
/// string. A missing revision yields empty markup, which makes the article
/// ineligible rather than failing the whole shard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawArticleWire", into = "RawArticleWire")]
pub struct RawArticle {
    /// Article title
    pub title: String,

    /// Source identifier, if the dump carried one
    pub id: Option<String>,

    /// Raw markup of the article's current revision
    pub revision_text: String,
}

impl RawArticle {
    /// Create a raw article without an identifier
    pub fn new(title: impl Into<String>, revision_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: None,
            revision_text: revision_text.into(),
        }
    }

    /// Attach a source identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Serialize, Deserialize)]
struct RawArticleWire {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(default)]
    revision: Option<RevisionWire>,
}

#[derive(Serialize, Deserialize)]
struct RevisionWire {
    #[serde(default)]
    text: Option<String>,
}

impl From<RawArticleWire> for RawArticle {
    fn from(wire: RawArticleWire) -> Self {
        let id = match wire.id {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self {
            title: wire.title,
            id,
            revision_text: wire
                .revision
                .and_then(|revision| revision.text)
                .unwrap_or_default(),
        }
    }
}

impl From<RawArticle> for RawArticleWire {
    fn from(article: RawArticle) -> Self {
        Self {
            title: article.title,
            id: article.id.map(Value::String),
            revision: Some(RevisionWire {
                text: Some(article.revision_text),
            }),
        }
    }
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, positive north
    pub lat: f64,

    /// Longitude, positive east
    pub lon: f64,
}

impl Coordinates {
    /// Create a coordinate pair
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Structured facts derived from an eligible article
///
/// An `ExtractedArticle` only exists for articles that have a non-empty
/// history section and at least one coordinate pair. The optional
/// descriptions are best effort; `None` means the derivation failed or
/// produced nothing. `events` stays `None` until the enrichment pass fills it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedArticle {
    /// Article title
    pub title: String,

    /// Source identifier (omitted when the output shape excludes it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Rendered text of the history section
    pub history: String,

    /// Representative location (the last coordinate pair in the document)
    pub coordinates: Coordinates,

    /// Short summary of the article
    #[serde(default)]
    pub short_description: Option<String>,

    /// Text of the first non-empty paragraph
    #[serde(default)]
    pub description: Option<String>,

    /// Dated events, populated by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
}

/// An extracted article paired with the text the enrichment pass reads
///
/// The candidate text (sentences that carry dates) is assembled upstream and
/// treated as opaque here. An empty text means the article is not eligible
/// for enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentCandidate {
    /// The article to enrich
    #[serde(flatten)]
    pub article: ExtractedArticle,

    /// Narrative text handed to the completion service
    #[serde(default, rename = "sentencesWithDates", alias = "datedText")]
    pub dated_text: String,
}

impl EnrichmentCandidate {
    /// Whether there is any text to enrich
    pub fn has_text(&self) -> bool {
        !self.dated_text.trim().is_empty()
    }
}
