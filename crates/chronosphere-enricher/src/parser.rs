//! Validate completion payloads into events

use crate::error::EnrichError;
use crate::prompt::schema_contract;
use chronosphere_domain::{Event, EventsPayload};
use jsonschema::Validator;
use serde_json::Value;
use tracing::warn;

/// Checks raw completion payloads against the schema contract
///
/// The completion service is asked to conform, but nothing it returns is
/// trusted until it passes here.
pub struct PayloadValidator {
    validator: Validator,
    strict_granularity: bool,
}

impl PayloadValidator {
    /// Compile the schema contract
    pub fn new(strict_granularity: bool) -> Result<Self, EnrichError> {
        let validator = jsonschema::validator_for(&schema_contract())
            .map_err(|e| EnrichError::Config(format!("invalid schema contract: {}", e)))?;
        Ok(Self {
            validator,
            strict_granularity,
        })
    }

    /// Parse and validate one payload
    pub fn parse(&self, payload: &str) -> Result<Vec<Event>, EnrichError> {
        let json_str = extract_json(payload)?;

        let value: Value = serde_json::from_str(json_str)
            .map_err(|e| EnrichError::SchemaViolation(format!("JSON parse error: {}", e)))?;

        let errors: Vec<String> = self
            .validator
            .iter_errors(&value)
            .map(|e| e.to_string())
            .collect();
        if !errors.is_empty() {
            return Err(EnrichError::SchemaViolation(errors.join("; ")));
        }

        let payload: EventsPayload = serde_json::from_value(value)
            .map_err(|e| EnrichError::SchemaViolation(e.to_string()))?;

        for event in &payload.dates {
            for span in event.dates.iter().filter(|s| !s.is_consistent()) {
                let message = format!(
                    "event '{}': date '{}' does not match granularity '{}'",
                    event.title, span.date, span.granularity
                );
                if self.strict_granularity {
                    return Err(EnrichError::SchemaViolation(message));
                }
                warn!("{}", message);
            }
        }

        Ok(payload.dates)
    }
}

/// Extract JSON from a payload, tolerating a markdown code fence
fn extract_json(payload: &str) -> Result<&str, EnrichError> {
    let trimmed = payload.trim();
    if !trimmed.starts_with("```") {
        return Ok(trimmed);
    }

    let body = trimmed
        .split_once('\n')
        .map(|(_, rest)| rest)
        .ok_or_else(|| EnrichError::SchemaViolation("Empty code block".to_string()))?;
    Ok(body.trim_end().trim_end_matches("```").trim())
}
