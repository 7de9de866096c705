//! Enrich command implementation.

use crate::cli::EnrichArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use chronosphere_enricher::{load_corpus, EnricherConfig, EnrichmentDriver, EventEnricher};
use chronosphere_llm::{OpenAiConfig, OpenAiProvider};
use tracing::{info, warn};

/// Execute the enrich command.
///
/// Articles that fail are reported in the summary but do not fail the command.
pub async fn execute_enrich(args: EnrichArgs, config: &Config) -> Result<()> {
    let (enrich_config, openai_config) = stage_configs(&args, config);

    let mut candidates = load_corpus(&args.corpus).await?;
    if let Some(limit) = args.limit {
        if limit == 0 {
            return Err(CliError::InvalidInput("--limit must be greater than 0".to_string()));
        }
        candidates.truncate(limit);
    }

    let provider = OpenAiProvider::from_env(openai_config)?;
    info!("Using model {}", provider.model());

    let enricher = EventEnricher::new(provider, enrich_config)?;
    let summary = EnrichmentDriver::new(enricher).run(candidates).await?;

    for failure in &summary.failed {
        warn!("'{}' was not enriched: {}", failure.title, failure.reason);
    }

    println!(
        "Enriched {} articles: {} skipped, {} failed",
        summary.enriched,
        summary.skipped,
        summary.failed.len()
    );
    Ok(())
}

/// Apply command-line overrides on top of the configured settings.
fn stage_configs(args: &EnrichArgs, config: &Config) -> (EnricherConfig, OpenAiConfig) {
    let mut enrich = config.enrich.clone();
    let mut openai = config.openai.clone();

    if let Some(output_dir) = &args.output_dir {
        enrich.output_dir = output_dir.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        enrich.completion_timeout_secs = timeout_secs;
    }
    if args.strict_granularity {
        enrich.strict_granularity = true;
    }
    if args.skip_existing {
        enrich.skip_existing = true;
    }
    if let Some(model) = &args.model {
        openai.model = model.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        openai.endpoint = endpoint.clone();
    }
    (enrich, openai)
}
