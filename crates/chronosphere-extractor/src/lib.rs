//! Chronosphere Extractor
//!
//! Turns sharded article dumps into structured, geolocated article records.
//!
//! # Overview
//!
//! A corpus arrives as numbered shard files, each a JSON array of raw
//! articles with their markup. The extractor reads every shard, keeps the
//! articles that have both a history section and at least one coordinate
//! pair, and writes the extracted facts back out keyed by shard index.
//!
//! # Architecture
//!
//! ```text
//! ArticleSource → ShardProcessor → FieldExtractor → MarkupParser
//!                       ↑
//!                 BatchScheduler → output files, ProgressReporter
//! ```
//!
//! Shards are processed in contiguous groups. All shards of a group run
//! concurrently and the next group waits for the previous one to settle, which
//! bounds open files and decoded JSON held in memory. A shard that cannot be
//! read is logged and skipped; it never stops the run.
//!
//! # Example Usage
//!
//! ```no_run
//! use chronosphere_extractor::{BatchScheduler, ExtractorConfig, LogProgress, WikitextParser};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractorConfig::default();
//! let scheduler = BatchScheduler::from_config(config, WikitextParser::new())?
//!     .with_reporter(Arc::new(LogProgress));
//!
//! // Count the input files and process every shard
//! let summary = scheduler.run(None).await?;
//!
//! println!("Succeeded: {} shards", summary.succeeded);
//! println!("Failed: {} shards", summary.failed.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod fields;
mod progress;
mod scheduler;
mod shard;
mod source;
pub mod wikitext;

pub use config::{ExtractorConfig, OutputLayout, INDEX_PLACEHOLDER};
pub use error::{ExtractError, FieldError};
pub use fields::FieldExtractor;
pub use progress::{ChannelProgress, LogProgress, NoopProgress, Progress, ProgressReporter};
pub use scheduler::{partition, BatchScheduler, RunSummary, ShardFailure, WriteFailure};
pub use shard::ShardProcessor;
pub use source::{decode_shard, ArticleSource};
pub use wikitext::{WikitextDocument, WikitextParser};
