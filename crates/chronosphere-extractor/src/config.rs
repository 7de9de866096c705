//! Configuration for the extraction pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder substituted with the shard index in file patterns
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// How extracted articles are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLayout {
    /// One compact JSON array per shard, keyed by shard index
    PerShard,
    /// A single pretty-printed JSON array holding every shard's articles
    Combined,
}

impl Default for OutputLayout {
    fn default() -> Self {
        OutputLayout::PerShard
    }
}

/// Configuration for a batch extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Directory holding the input shard files
    pub input_dir: PathBuf,

    /// Directory output files are written to
    pub output_dir: PathBuf,

    /// Input file name, with `{index}` standing for the shard index
    pub input_file_pattern: String,

    /// Per-shard output file name, with `{index}` standing for the shard index
    pub output_file_pattern: String,

    /// Output file name for the combined layout
    pub combined_file_name: String,

    /// Shards processed concurrently per group; `0` puts every shard in one group
    pub group_size: usize,

    /// Whether extracted articles carry the source `id`
    pub include_id: bool,

    /// Heading of the section holding the historical narrative
    pub history_heading: String,

    /// Output layout
    pub layout: OutputLayout,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./1_wikisplitter_output"),
            output_dir: PathBuf::from("./2_wikitext_parser_output"),
            input_file_pattern: "{index}_wiki_part.json".to_string(),
            output_file_pattern: "parsed_wiki_part_{index}.json".to_string(),
            combined_file_name: "parsed_articles.json".to_string(),
            group_size: 100,
            include_id: true,
            history_heading: "History".to_string(),
            layout: OutputLayout::PerShard,
        }
    }
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.input_file_pattern.contains(INDEX_PLACEHOLDER) {
            return Err(format!("input_file_pattern must contain {}", INDEX_PLACEHOLDER));
        }
        if self.layout == OutputLayout::PerShard
            && !self.output_file_pattern.contains(INDEX_PLACEHOLDER)
        {
            return Err(format!("output_file_pattern must contain {}", INDEX_PLACEHOLDER));
        }
        if self.layout == OutputLayout::Combined && self.combined_file_name.is_empty() {
            return Err("combined_file_name must not be empty".to_string());
        }
        if self.history_heading.trim().is_empty() {
            return Err("history_heading must not be empty".to_string());
        }
        Ok(())
    }

    /// Path of the input shard with the given index
    pub fn input_path(&self, index: usize) -> PathBuf {
        shard_path(&self.input_dir, &self.input_file_pattern, index)
    }

    /// Path of the per-shard output file with the given index
    pub fn output_path(&self, index: usize) -> PathBuf {
        shard_path(&self.output_dir, &self.output_file_pattern, index)
    }

    /// Path of the combined output file
    pub fn combined_path(&self) -> PathBuf {
        self.output_dir.join(&self.combined_file_name)
    }

    /// Whether every shard runs in a single group
    pub fn is_unbounded(&self) -> bool {
        self.group_size == 0
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

pub(crate) fn shard_path(dir: &Path, pattern: &str, index: usize) -> PathBuf {
    dir.join(pattern.replace(INDEX_PLACEHOLDER, &index.to_string()))
}
