//! Chronosphere Enricher
//!
//! Turns the narrative text of extracted articles into dated events using a
//! structured completion service.
//!
//! # Overview
//!
//! Each candidate article carries a precomputed text made of the sentences
//! that mention dates. The enricher sends that text to the completion service
//! as a forced function call whose arguments must follow a fixed JSON Schema,
//! validates what comes back, and writes the article with its events to a
//! file named after its title.
//!
//! # Architecture
//!
//! ```text
//! Corpus → EnrichmentDriver → EventEnricher → CompletionProvider
//!                 ↓                  ↓
//!          <title>.json      PayloadValidator (schema contract)
//! ```
//!
//! Candidates are processed strictly one after another so that the
//! completion service's rate limits hold. A failure on one article is logged
//! and the driver moves on.
//!
//! # Example Usage
//!
//! ```no_run
//! use chronosphere_enricher::{load_corpus, EnricherConfig, EnrichmentDriver, EventEnricher};
//! use chronosphere_llm::MockProvider;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"dates": []}"#);
//! let enricher = EventEnricher::new(llm, EnricherConfig::default())?;
//! let driver = EnrichmentDriver::new(enricher);
//!
//! let candidates = load_corpus(Path::new("./3_candidates.json")).await?;
//! let summary = driver.run(candidates).await?;
//!
//! println!("Enriched: {} articles", summary.enriched);
//! println!("Failures: {} articles", summary.failed.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod corpus;
mod driver;
mod enricher;
mod error;
mod parser;
pub mod prompt;


pub use config::EnricherConfig;
pub use corpus::load_corpus;
pub use driver::{sanitize_title, ArticleFailure, EnrichmentDriver, EnrichmentSummary};
pub use enricher::EventEnricher;
pub use error::EnrichError;
pub use parser::PayloadValidator;
