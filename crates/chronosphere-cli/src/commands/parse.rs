//! Parse command implementation.

use crate::cli::ParseArgs;
use crate::config::Config;
use crate::error::Result;
use crate::progress::BarProgress;
use chronosphere_extractor::{
    BatchScheduler, ExtractorConfig, LogProgress, OutputLayout, ProgressReporter, WikitextParser,
};
use std::sync::Arc;
use tracing::warn;

/// Execute the parse command.
///
/// Shard failures are reported in the summary but do not fail the command.
pub async fn execute_parse(args: ParseArgs, config: &Config) -> Result<()> {
    let no_progress = args.no_progress;
    let shard_count = args.shard_count;
    let extract = extractor_config(args, &config.extract);

    let reporter: Arc<dyn ProgressReporter> = if no_progress {
        Arc::new(LogProgress)
    } else {
        Arc::new(BarProgress::new())
    };

    let scheduler =
        BatchScheduler::from_config(extract, WikitextParser::new())?.with_reporter(reporter);
    let summary = scheduler.run(shard_count).await?;

    for failure in &summary.failed {
        warn!("Shard {} produced no output: {}", failure.index, failure.reason);
    }

    println!(
        "Parsed {}/{} shards: {} articles extracted, {} shard failures, {} write failures",
        summary.succeeded,
        summary.total_shards,
        summary.articles_extracted,
        summary.failed.len(),
        summary.write_failures.len()
    );
    Ok(())
}

/// Apply command-line overrides on top of the configured settings.
fn extractor_config(args: ParseArgs, base: &ExtractorConfig) -> ExtractorConfig {
    let mut config = base.clone();

    if let Some(input_dir) = args.input_dir {
        config.input_dir = input_dir;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(group_size) = args.group_size {
        config.group_size = group_size;
    }
    if args.unbounded {
        config.group_size = 0;
    }
    if args.no_id {
        config.include_id = false;
    }
    if args.combined {
        config.layout = OutputLayout::Combined;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    fn parse_args(argv: &[&str]) -> ParseArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Parse(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_defaults_come_from_config() {
        let base = ExtractorConfig {
            group_size: 10,
            ..Default::default()
        };
        let config = extractor_config(parse_args(&["chronosphere", "parse"]), &base);
        assert_eq!(config, base);
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse_args(&[
            "chronosphere",
            "parse",
            "in",
            "--output-dir",
            "out",
            "--unbounded",
            "--no-id",
            "--combined",
        ]);
        let config = extractor_config(args, &ExtractorConfig::default());

        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.is_unbounded());
        assert!(!config.include_id);
        assert_eq!(config.layout, OutputLayout::Combined);
    }

    #[tokio::test]
    async fn test_execute_parse_on_empty_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir(&input).unwrap();

        let args = parse_args(&[
            "chronosphere",
            "parse",
            input.to_str().unwrap(),
            "--no-progress",
        ]);
        let mut config = Config::default();
        config.extract.output_dir = dir.path().join("out");

        execute_parse(args, &config).await.unwrap();
        assert!(!dir.path().join("out").exists());
    }
}
