//! Trait definitions for external capabilities
//!
//! These traits define the boundaries between the pipeline and the two
//! collaborators it treats as black boxes: a markup parser and a structured
//! completion service. Implementations live in other crates.

use crate::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// A section of a parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    heading: String,
    text: String,
}

impl Section {
    /// Create a section from its heading and rendered plain text
    pub fn new(heading: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            text: text.into(),
        }
    }

    /// Canonical heading text
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Rendered plain text of the section body
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A paragraph of a parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    text: String,
}

impl Paragraph {
    /// Create a paragraph from its rendered plain text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Rendered plain text
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Trait for turning raw markup into a navigable document
///
/// Implemented by the extraction layer (chronosphere-extractor)
pub trait MarkupParser: Send + Sync {
    /// Parsed document type
    type Document: MarkupDocument;

    /// Parse raw markup. Parsing itself never fails; malformed markup
    /// produces a document with fewer sections.
    fn parse(&self, text: &str) -> Self::Document;
}

/// A parsed document
pub trait MarkupDocument {
    /// Error type for derivations that may fail
    type Error: fmt::Display;

    /// Find the section whose canonical heading equals `heading` exactly
    fn section(&self, heading: &str) -> Option<Section>;

    /// All coordinate pairs, in document order
    fn coordinates(&self) -> Vec<Coordinates>;

    /// A short summary of the article
    fn summary(&self) -> Result<String, Self::Error>;

    /// All paragraphs, in document order
    fn paragraphs(&self) -> Result<Vec<Paragraph>, Self::Error>;
}

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instruction message
    System,

    /// User content
    User,
}

/// One message of a completion prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role
    pub role: Role,

    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A function the completion service is forced to call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Function name, also used to force the call
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema of the function arguments
    pub parameters: serde_json::Value,
}

/// A structured completion request: messages plus one forced function
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Prompt messages, in order
    pub messages: Vec<ChatMessage>,

    /// The function whose arguments the service must produce
    pub function: FunctionSpec,
}

/// Trait for structured completion services
///
/// Implemented by the infrastructure layer (chronosphere-llm)
pub trait CompletionProvider: Send + Sync {
    /// Error type for completion calls
    type Error: fmt::Display + Send;

    /// Request a forced structured call and return the raw argument payload
    ///
    /// The payload is expected to be JSON conforming to
    /// `request.function.parameters`, but callers validate it on receipt.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
