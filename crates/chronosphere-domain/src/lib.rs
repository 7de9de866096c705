//! Chronosphere Domain Layer
//!
//! This crate contains the data model shared by every stage of the
//! Chronosphere pipeline, plus the trait interfaces for the two external
//! capabilities the pipeline depends on.
//!
//! ## Key Concepts
//!
//! - **RawArticle**: One article record from a shard file, holding raw markup
//! - **ExtractedArticle**: The structured facts pulled out of an eligible article
//! - **Event**: A normalized, dated happening produced by the enrichment pass
//! - **DateSpan**: A date string plus the granularity at which it is known
//!
//! ## Architecture
//!
//! - Only `serde`/`serde_json` as dependencies: the JSON shape is part of the model
//! - No I/O and no async runtime
//! - Trait definitions for the markup parser and the completion service;
//!   implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod article;
pub mod event;
pub mod traits;

// Re-exports for convenience
pub use article::{Coordinates, EnrichmentCandidate, ExtractedArticle, RawArticle};
pub use event::{DateSpan, Event, EventsPayload, Granularity};
