//! Integration tests for corpus discovery, checkpointing and resume

use mailmine::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, tempdir};

fn mail_corpus(rows: usize) -> MemoryCorpus {
    MemoryCorpus::new(
        (0..rows)
            .map(|i| {
                let body = match i % 3 {
                    0 => format!("Please process PO 0505{:06} today", i),
                    1 => format!("Ticket TS-{} raised by support", 1_800_000 + i % 7),
                    _ => format!("Quote WQ-{} attached, see deal XHU-{:05}", 1_234_500 + i % 5, i % 4),
                };
                CorpusRow::new(format!("msg-{}", i), "Re: update", body)
            })
            .collect(),
    )
}

fn config(batch_size: usize, checkpoint: &std::path::Path) -> DiscoveryConfig {
    DiscoveryConfig {
        batch_size,
        checkpoint_path: Some(checkpoint.to_path_buf()),
        min_frequency: 2,
        ..DiscoveryConfig::default()
    }
}

#[tokio::test]
async fn test_interrupted_run_matches_single_pass() {
    let dir = tempdir().unwrap();
    let corpus = mail_corpus(60);

    let single_path = dir.path().join("single.json");
    let mut single = Discoverer::new(config(10, &single_path));
    let outcome = single.run(&corpus).await.unwrap();
    assert_eq!(outcome.status, DiscoveryStatus::Completed);
    let expected = single.into_record();

    // Stop after half of the batches, then restart from the checkpoint
    let split_path = dir.path().join("split.json");
    let mut first = Discoverer::new(config(10, &split_path)).with_batch_limit(3);
    let outcome = first.run(&corpus).await.unwrap();
    assert_eq!(outcome.status, DiscoveryStatus::BatchLimitReached);
    assert_eq!(first.record().processed_count, 30);
    drop(first);

    let mut second = Discoverer::new(config(10, &split_path));
    let outcome = second.run(&corpus).await.unwrap();
    assert!(outcome.resumed);
    assert_eq!(outcome.rows_scanned, 30);
    let resumed = second.into_record();

    assert_eq!(resumed.processed_count, expected.processed_count);
    assert_eq!(resumed.current_batch, expected.current_batch);
    assert_eq!(resumed.unique_patterns, expected.unique_patterns);
    assert_eq!(resumed.patterns_found, expected.patterns_found);
    assert_eq!(resumed.classification_hints, expected.classification_hints);
}

#[tokio::test]
async fn test_cancelled_run_resumes_without_double_counting() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("checkpoint.json");
    let corpus = mail_corpus(40);

    let flag = CancelFlag::new();
    let trigger = flag.clone();
    let mut discoverer = Discoverer::new(config(5, &path))
        .with_cancel_flag(flag)
        .on_progress(move |progress| {
            if progress.batch == 2 {
                trigger.cancel();
            }
        });
    let outcome = discoverer.run(&corpus).await.unwrap();
    assert_eq!(outcome.status, DiscoveryStatus::Cancelled);
    assert_eq!(discoverer.state(), DiscoveryState::Cancelled);

    let saved = CheckpointStore::new(&path).load().await.unwrap().unwrap();
    assert_eq!(saved.processed_count, 10);
    assert_eq!(saved.current_batch, 2);

    let mut resumed = Discoverer::new(config(5, &path));
    resumed.run(&corpus).await.unwrap();
    assert_eq!(resumed.record().processed_count, 40);
    assert_eq!(resumed.state(), DiscoveryState::Done);
}

#[tokio::test]
async fn test_checkpoint_round_trip_preserves_record() {
    let dir = tempdir().unwrap();
    let store = CheckpointStore::new(dir.path().join("nested").join("record.json"));

    let mut record = DiscoveryRecord::new();
    record.record_match("upper_dash_number", "TS-1818562");
    record.record_match("upper_dash_number", "TS-1818562");
    record.record_match("long_number", "0505915850");
    record.record_hint("TS-1818562", "ticket");
    record.processed_count = 2;
    record.current_batch = 1;
    record.touch();

    store.save(&record).await.unwrap();
    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.count_of("upper_dash_number", "TS-1818562"), 2);

    store.clear().await.unwrap();
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_corrupt_checkpoint_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{ not a record").unwrap();

    let mut discoverer = Discoverer::new(DiscoveryConfig {
        checkpoint_path: Some(file.path().to_path_buf()),
        ..DiscoveryConfig::default()
    });
    let err = discoverer.run(&mail_corpus(3)).await.unwrap_err();
    assert!(matches!(err, MailmineError::Checkpoint(_)));
}

#[tokio::test]
async fn test_structural_grouping_across_prefixes() {
    let mut texts = Vec::new();
    for i in 0..30 {
        texts.push(format!("Reference XHU-{:05} for your records", 10_000 + i % 3));
        texts.push(format!("Reference ZDW-{:05} for your records", 20_000 + i % 3));
        texts.push(format!("Reference ABC-{:05} for your records", 30_000 + i % 3));
    }
    let corpus = MemoryCorpus::from_texts(texts);

    let discovery = mailmine::discover(&corpus, None, 5).await.unwrap();
    assert_eq!(discovery.outcome.status, DiscoveryStatus::Completed);
    assert_eq!(discovery.record.processed_count, 90);

    let group = discovery.report.structure("A-#").expect("A-# group");
    assert_eq!(group.distinct_values, 9);
    assert!(group.pattern_types.contains(&"upper_dash_number".to_string()));
    assert!(group.samples.iter().any(|s| s.starts_with("XHU-")));
}

#[tokio::test]
async fn test_discover_applies_min_frequency_to_report_only() {
    let mut texts = vec!["Ticket TS-1818562 opened".to_string(); 6];
    texts.push("Ticket TS-7777777 opened".to_string());
    let corpus = MemoryCorpus::from_texts(texts);

    let discovery = mailmine::discover(&corpus, None, 5).await.unwrap();
    assert_eq!(discovery.record.count_of("upper_dash_number", "TS-7777777"), 1);

    let upper_dash = discovery
        .report
        .pattern_types
        .iter()
        .find(|p| p.pattern_type == "upper_dash_number")
        .expect("upper_dash_number report");
    assert!(upper_dash.frequent.iter().any(|p| p.value == "TS-1818562" && p.count == 6));
    assert!(upper_dash.frequent.iter().all(|p| p.value != "TS-7777777"));
    assert_eq!(
        upper_dash.frequent.iter().find(|p| p.value == "TS-1818562").unwrap().hint.as_deref(),
        Some("ticket")
    );
}

#[tokio::test]
async fn test_json_lines_corpus_skips_bad_rows() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"id": "1", "subject": "PO", "body": "PO 0505915850 attached"}}"#).unwrap();
    writeln!(file, "this is not json").unwrap();
    writeln!(file, r#"{{"id": "2", "subject": "no body"}}"#).unwrap();
    writeln!(file).unwrap();
    writeln!(file, r#"{{"id": "3", "body": "Ticket TS-1818562 opened"}}"#).unwrap();
    file.flush().unwrap();

    let corpus = JsonLinesCorpus::open(file.path()).await.unwrap();
    let dir = tempdir().unwrap();
    let discovery = mailmine::discover(&corpus, Some(dir.path().join("c.json").as_path()), 1)
        .await
        .unwrap();

    assert_eq!(discovery.outcome.rows_scanned, 2);
    assert_eq!(discovery.outcome.rows_skipped, 3);
    assert_eq!(discovery.record.processed_count, 2);
    assert_eq!(discovery.record.skipped_rows, 3);
    assert_eq!(discovery.record.count_of("upper_dash_number", "TS-1818562"), 1);
}

#[tokio::test]
async fn test_missing_corpus_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = JsonLinesCorpus::open(dir.path().join("missing.jsonl")).await.unwrap_err();
    assert!(err.to_string().contains("corpus I/O error"));
}

#[tokio::test]
async fn test_facade_report_after_discovery() {
    let mut mailmine = MailmineBuilder::default()
        .with_min_frequency(3)
        .build()
        .await
        .unwrap();

    let corpus = MemoryCorpus::from_texts((0..12).map(|i| format!("Case TS-{} updated", 1_900_000 + i % 4)));
    mailmine.discover(&corpus).await.unwrap();

    let report = mailmine.report().unwrap();
    assert_eq!(report.processed_count, 12);
    assert!(report.frequent_count() >= 4);

    let result = mailmine.extract("Your case TS-1900001 is closed");
    let template = result
        .matches
        .iter()
        .find(|c| c.value == "TS-1900001")
        .expect("ticket candidate");
    assert_eq!(template.category, Some(EntityCategory::Ticket));
}

#[tokio::test]
async fn test_resume_past_invalid_utf8_line() {
    let dir = tempdir().unwrap();
    let corpus_path = dir.path().join("corpus.jsonl");
    let mut bytes = br#"{"id": "1", "body": "PO 0505915850 attached"}"#.to_vec();
    bytes.extend_from_slice(b"\n\xff\xfe\xfd not text\n");
    bytes.extend_from_slice(br#"{"id": "3", "body": "Ticket TS-1818562 opened"}"#);
    bytes.push(b'\n');
    bytes.extend_from_slice(br#"{"id": "4", "body": "Ticket TS-1818563 opened"}"#);
    bytes.push(b'\n');
    std::fs::write(&corpus_path, bytes).unwrap();
    let checkpoint = dir.path().join("checkpoint.json");

    let corpus = JsonLinesCorpus::open(&corpus_path).await.unwrap();
    let mut first = Discoverer::new(config(2, &checkpoint)).with_batch_limit(1);
    let outcome = first.run(&corpus).await.unwrap();
    assert_eq!(outcome.status, DiscoveryStatus::BatchLimitReached);
    assert_eq!(outcome.rows_scanned, 1);
    assert_eq!(outcome.rows_skipped, 1);
    drop(first);

    // A new handle has to skip the bad line again to reach the resume offset
    let reopened = JsonLinesCorpus::open(&corpus_path).await.unwrap();
    let mut second = Discoverer::new(config(2, &checkpoint));
    let outcome = second.run(&reopened).await.unwrap();
    assert!(outcome.resumed);
    assert_eq!(outcome.status, DiscoveryStatus::Completed);
    assert_eq!(outcome.rows_scanned, 2);
    assert_eq!(second.record().processed_count, 3);
    assert_eq!(second.record().skipped_rows, 1);
    assert_eq!(second.record().count_of("upper_dash_number", "TS-1818563"), 1);
}
