//! Event extraction from one narrative text

use crate::config::EnricherConfig;
use crate::error::EnrichError;
use crate::parser::PayloadValidator;
use crate::prompt::build_request;
use chronosphere_domain::traits::CompletionProvider;
use chronosphere_domain::Event;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::debug;

/// Turns narrative text into validated events through a completion service
pub struct EventEnricher<L: CompletionProvider> {
    llm: Arc<L>,
    validator: PayloadValidator,
    config: EnricherConfig,
}

impl<L: CompletionProvider> EventEnricher<L> {
    /// Create a new enricher
    pub fn new(llm: L, config: EnricherConfig) -> Result<Self, EnrichError> {
        Self::with_shared(Arc::new(llm), config)
    }

    /// Create an enricher around a provider that is shared elsewhere
    pub fn with_shared(llm: Arc<L>, config: EnricherConfig) -> Result<Self, EnrichError> {
        config.validate().map_err(EnrichError::Config)?;
        Ok(Self {
            llm,
            validator: PayloadValidator::new(config.strict_granularity)?,
            config,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &EnricherConfig {
        &self.config
    }

    /// Extract the events described in `text`
    ///
    /// Fails with `Completion` or `Timeout` when the service call fails, and
    /// with `SchemaViolation` when the payload does not satisfy the contract.
    pub async fn enrich(&self, text: &str) -> Result<Vec<Event>, EnrichError> {
        let request = build_request(text, &self.config.function_name);

        let payload = timeout(self.config.completion_timeout(), self.llm.complete(&request))
            .await
            .map_err(|_| EnrichError::Timeout(self.config.completion_timeout()))?
            .map_err(|e| EnrichError::Completion(e.to_string()))?;

        let events = self.validator.parse(&payload)?;
        debug!("Extracted {} events from {} chars", events.len(), text.len());
        Ok(events)
    }
}
