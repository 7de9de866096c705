//! Configuration for the enrichment pass

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for enrichment runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnricherConfig {
    /// Directory enriched articles are written to, one file per title
    pub output_dir: PathBuf,

    /// Maximum time for a single completion call (seconds)
    pub completion_timeout_secs: u64,

    /// Reject events whose granularity does not match their date's precision
    pub strict_granularity: bool,

    /// Skip candidates whose output file already exists
    pub skip_existing: bool,

    /// Pause between consecutive completion calls (milliseconds)
    pub request_interval_ms: u64,

    /// Name of the function the completion service is forced to call
    pub function_name: String,
}

impl EnricherConfig {
    /// Get the completion timeout as a Duration
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    /// Get the pause between completion calls as a Duration
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.completion_timeout_secs == 0 {
            return Err("completion_timeout_secs must be greater than 0".to_string());
        }
        if self.function_name.is_empty() {
            return Err("function_name must not be empty".to_string());
        }
        if !self
            .function_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(format!("Invalid function_name: {}", self.function_name));
        }
        Ok(())
    }
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./4_enriched_articles"),
            completion_timeout_secs: 120,
            strict_granularity: false,
            skip_existing: false,
            request_interval_ms: 0,
            function_name: "extract_dates".to_string(),
        }
    }
}

impl EnricherConfig {
    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EnricherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.completion_timeout(), Duration::from_secs(120));
        assert_eq!(config.request_interval(), Duration::ZERO);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = EnricherConfig {
            completion_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_function_name_rejected() {
        let config = EnricherConfig {
            function_name: "extract dates".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EnricherConfig {
            completion_timeout_secs: 300,
            skip_existing: true,
            request_interval_ms: 500,
            ..Default::default()
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = EnricherConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EnricherConfig::from_toml("strict_granularity = true").unwrap();
        assert!(config.strict_granularity);
        assert_eq!(config.function_name, "extract_dates");
    }
}
