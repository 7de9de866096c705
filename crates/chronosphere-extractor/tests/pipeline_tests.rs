//! Integration tests for chronosphere-extractor
//!
//! These tests run whole batches against shard files in a temporary directory.

use chronosphere_domain::{Coordinates, ExtractedArticle};
use chronosphere_extractor::{
    BatchScheduler, ChannelProgress, ExtractError, ExtractorConfig, OutputLayout, Progress,
    WikitextParser,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const ALBERTA: &str = "\
{{Short description|Province of Canada}}
{{Infobox province|coordinates={{coord|55|N|115|W}}}}
'''Alberta''' is a [[Provinces and territories of Canada|province]] of [[Canada]].

== History ==
In 1821 the fur trading companies merged.

== Geography ==
{{coord|54.0|-113.0|display=title}}
";

fn config(dir: &TempDir) -> ExtractorConfig {
    ExtractorConfig {
        input_dir: dir.path().join("in"),
        output_dir: dir.path().join("out"),
        ..Default::default()
    }
}

fn write_shard(config: &ExtractorConfig, index: usize, articles: serde_json::Value) {
    std::fs::create_dir_all(&config.input_dir).unwrap();
    std::fs::write(config.input_path(index), articles.to_string()).unwrap();
}

fn alberta_shard() -> serde_json::Value {
    json!([
        { "title": "Alberta", "id": "717", "revision": { "text": ALBERTA } },
        { "title": "Stub", "id": "718", "revision": { "text": "'''Stub''' is short." } }
    ])
}

fn read_output(path: &Path) -> Vec<ExtractedArticle> {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_single_shard_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    write_shard(&config, 0, alberta_shard());

    let scheduler = BatchScheduler::from_config(config.clone(), WikitextParser::new()).unwrap();
    let summary = scheduler.run(Some(1)).await.unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.articles_extracted, 1);
    assert!(summary.is_clean());

    let articles = read_output(&config.output_path(0));
    assert_eq!(articles.len(), 1);

    let alberta = &articles[0];
    assert_eq!(alberta.title, "Alberta");
    assert_eq!(alberta.id.as_deref(), Some("717"));
    assert_eq!(alberta.history, "In 1821 the fur trading companies merged.");
    assert_eq!(alberta.coordinates, Coordinates::new(54.0, -113.0));
    assert_eq!(alberta.short_description.as_deref(), Some("Province of Canada"));
    assert_eq!(alberta.description.as_deref(), Some("Alberta is a province of Canada."));
}

#[tokio::test]
async fn test_zero_shards_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    let scheduler = BatchScheduler::from_config(config.clone(), WikitextParser::new()).unwrap();
    let summary = scheduler.run(Some(0)).await.unwrap();

    assert_eq!(summary.total_shards, 0);
    assert_eq!(summary.succeeded, 0);
    assert!(!config.output_dir.exists());
}

#[tokio::test]
async fn test_shard_count_derived_from_input_dir() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    for index in 0..3 {
        write_shard(&config, index, alberta_shard());
    }

    let scheduler = BatchScheduler::from_config(config.clone(), WikitextParser::new()).unwrap();
    let summary = scheduler.run(None).await.unwrap();

    assert_eq!(summary.total_shards, 3);
    assert_eq!(summary.succeeded, 3);
    for index in 0..3 {
        assert!(config.output_path(index).exists());
    }
}

#[tokio::test]
async fn test_unreadable_input_dir_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    let scheduler = BatchScheduler::from_config(config, WikitextParser::new()).unwrap();
    let result = scheduler.run(None).await;

    assert!(matches!(result, Err(ExtractError::InputDirectory { .. })));
}

#[tokio::test]
async fn test_failed_shards_do_not_block_siblings() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    for index in 0..100 {
        if index == 42 {
            continue;
        }
        write_shard(&config, index, alberta_shard());
    }
    std::fs::write(config.input_path(7), "[{\"title\": ").unwrap();

    let scheduler = BatchScheduler::from_config(config.clone(), WikitextParser::new()).unwrap();
    let summary = scheduler.run(Some(100)).await.unwrap();

    assert_eq!(summary.succeeded, 98);
    let mut failed: Vec<usize> = summary.failed.iter().map(|f| f.index).collect();
    failed.sort();
    assert_eq!(failed, vec![7, 42]);

    let written = std::fs::read_dir(&config.output_dir).unwrap().count();
    assert_eq!(written, 98);
    assert!(!config.output_path(7).exists());
    assert!(!config.output_path(42).exists());
}

#[tokio::test]
async fn test_failure_in_one_group_does_not_stop_later_groups() {
    let dir = TempDir::new().unwrap();
    let config = ExtractorConfig {
        group_size: 2,
        ..config(&dir)
    };
    write_shard(&config, 1, alberta_shard());
    write_shard(&config, 2, alberta_shard());
    write_shard(&config, 3, alberta_shard());

    let scheduler = BatchScheduler::from_config(config.clone(), WikitextParser::new()).unwrap();
    let summary = scheduler.run(Some(4)).await.unwrap();

    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].index, 0);
    assert!(config.output_path(3).exists());
}

#[tokio::test]
async fn test_write_failure_does_not_block_later_shards() {
    let dir = TempDir::new().unwrap();
    let config = ExtractorConfig {
        group_size: 1,
        ..config(&dir)
    };
    write_shard(&config, 0, alberta_shard());
    write_shard(&config, 1, alberta_shard());
    // A directory at the output path makes the write fail
    std::fs::create_dir_all(config.output_path(0)).unwrap();

    let scheduler = BatchScheduler::from_config(config.clone(), WikitextParser::new()).unwrap();
    let summary = scheduler.run(Some(2)).await.unwrap();

    assert_eq!(summary.succeeded, 2);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.write_failures.len(), 1);
    assert_eq!(summary.write_failures[0].path, config.output_path(0));
    assert!(!summary.is_clean());
    assert_eq!(read_output(&config.output_path(1)).len(), 1);
}

#[tokio::test]
async fn test_null_revision_does_not_fail_shard() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    write_shard(
        &config,
        0,
        json!([
            { "title": "Empty", "revision": null },
            { "title": "Alberta", "id": 717, "revision": { "text": ALBERTA } }
        ]),
    );

    let scheduler = BatchScheduler::from_config(config.clone(), WikitextParser::new()).unwrap();
    let summary = scheduler.run(Some(1)).await.unwrap();

    assert!(summary.is_clean());
    let articles = read_output(&config.output_path(0));
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].id.as_deref(), Some("717"));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    write_shard(&config, 0, alberta_shard());
    write_shard(&config, 1, alberta_shard());

    let scheduler = BatchScheduler::from_config(config.clone(), WikitextParser::new()).unwrap();
    scheduler.run(Some(2)).await.unwrap();
    let first = std::fs::read(config.output_path(1)).unwrap();

    scheduler.run(Some(2)).await.unwrap();
    let second = std::fs::read(config.output_path(1)).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_output_without_id() {
    let dir = TempDir::new().unwrap();
    let config = ExtractorConfig {
        include_id: false,
        ..config(&dir)
    };
    write_shard(&config, 0, alberta_shard());

    let scheduler = BatchScheduler::from_config(config.clone(), WikitextParser::new()).unwrap();
    scheduler.run(Some(1)).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(config.output_path(0)).unwrap()).unwrap();
    assert!(raw[0].get("id").is_none());
    assert_eq!(raw[0]["title"], "Alberta");
}

#[tokio::test]
async fn test_combined_layout() {
    let dir = TempDir::new().unwrap();
    let config = ExtractorConfig {
        layout: OutputLayout::Combined,
        group_size: 1,
        ..config(&dir)
    };
    write_shard(&config, 0, alberta_shard());
    write_shard(
        &config,
        2,
        json!([{ "title": "Edmonton", "revision": { "text": "{{coord|53.5|-113.5}}\n== History ==\nFounded 1795." } }]),
    );

    let scheduler = BatchScheduler::from_config(config.clone(), WikitextParser::new()).unwrap();
    let summary = scheduler.run(Some(3)).await.unwrap();

    assert_eq!(summary.succeeded, 2);
    assert!(!config.output_path(0).exists());

    let contents = std::fs::read_to_string(config.combined_path()).unwrap();
    assert!(contents.contains('\n'));
    let titles: Vec<String> = serde_json::from_str::<Vec<ExtractedArticle>>(&contents)
        .unwrap()
        .into_iter()
        .map(|a| a.title)
        .collect();
    assert_eq!(titles, vec!["Alberta", "Edmonton"]);
}

#[tokio::test]
async fn test_progress_is_monotonic() {
    let dir = TempDir::new().unwrap();
    let config = ExtractorConfig {
        group_size: 3,
        ..config(&dir)
    };
    for index in 0..7 {
        write_shard(&config, index, alberta_shard());
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let scheduler = BatchScheduler::from_config(config, WikitextParser::new())
        .unwrap()
        .with_reporter(Arc::new(ChannelProgress::new(tx)));
    scheduler.run(Some(7)).await.unwrap();

    let mut updates: Vec<Progress> = Vec::new();
    while let Ok(progress) = rx.try_recv() {
        updates.push(progress);
    }

    let processed: Vec<usize> = updates.iter().map(|p| p.processed_shards).collect();
    assert_eq!(processed, vec![0, 3, 6, 7]);
    assert!(updates.iter().all(|p| p.total_shards == 7));
}
