//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use chronosphere_enricher::EnricherConfig;
use chronosphere_extractor::ExtractorConfig;
use chronosphere_llm::OpenAiConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration, one table per pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Settings for `parse`
    #[serde(default)]
    pub extract: ExtractorConfig,

    /// Settings for `enrich`
    #[serde(default)]
    pub enrich: EnricherConfig,

    /// Completion service connection
    #[serde(default)]
    pub openai: OpenAiConfig,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".chronosphere").join("config.toml"))
    }

    /// Load from an explicit path, or from the default path if it exists.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }
}
