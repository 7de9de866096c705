//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chronosphere - Extract geolocated history from Wikipedia dumps and date its events.
#[derive(Debug, Parser)]
#[command(name = "chronosphere")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ~/.chronosphere/config.toml)
    #[arg(short, long, global = true, env = "CHRONOSPHERE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract eligible articles from shard files
    Parse(ParseArgs),

    /// Extract dated events from candidate articles
    Enrich(EnrichArgs),
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Directory holding the input shard files
    pub input_dir: Option<PathBuf>,

    /// Number of shards; counted from the input directory when omitted
    pub shard_count: Option<usize>,

    /// Directory output files are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Shards processed concurrently per group
    #[arg(short, long, conflicts_with = "unbounded")]
    pub group_size: Option<usize>,

    /// Process every shard in a single group
    #[arg(long)]
    pub unbounded: bool,

    /// Omit the source id from extracted articles
    #[arg(long)]
    pub no_id: bool,

    /// Write one combined, pretty-printed file instead of one file per shard
    #[arg(long)]
    pub combined: bool,

    /// Log progress lines instead of drawing a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the enrich command.
#[derive(Debug, Parser)]
pub struct EnrichArgs {
    /// JSON file of candidates, or a directory of such files
    pub corpus: PathBuf,

    /// Directory enriched articles are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Base URL of the completion service
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Timeout for each completion call (seconds)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Reject events whose granularity does not match their date
    #[arg(long)]
    pub strict_granularity: bool,

    /// Skip articles whose output file already exists
    #[arg(long)]
    pub skip_existing: bool,

    /// Enrich at most this many candidates
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_with_positionals() {
        let cli = Cli::try_parse_from(["chronosphere", "parse", "shards", "250", "--no-id"]).unwrap();
        match cli.command {
            Command::Parse(args) => {
                assert_eq!(args.input_dir, Some(PathBuf::from("shards")));
                assert_eq!(args.shard_count, Some(250));
                assert!(args.no_id);
                assert!(!args.unbounded);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["chronosphere", "parse"]).unwrap();
        match cli.command {
            Command::Parse(args) => {
                assert!(args.input_dir.is_none());
                assert!(args.shard_count.is_none());
                assert!(args.group_size.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_group_size_conflicts_with_unbounded() {
        let result =
            Cli::try_parse_from(["chronosphere", "parse", "--group-size", "10", "--unbounded"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_enrich_requires_corpus() {
        assert!(Cli::try_parse_from(["chronosphere", "enrich"]).is_err());

        let cli = Cli::try_parse_from([
            "chronosphere",
            "-v",
            "enrich",
            "candidates.json",
            "--limit",
            "5",
            "--skip-existing",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Enrich(args) => {
                assert_eq!(args.corpus, PathBuf::from("candidates.json"));
                assert_eq!(args.limit, Some(5));
                assert!(args.skip_existing);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
