use super::scanner::scan_row;
use super::{CheckpointStore, CorpusSource, DiscoveryRecord, RetryPolicy, RowRead};
use crate::Result;
use crate::config::DiscoveryConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Lifecycle of a [`Discoverer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryState {
    /// No record loaded yet
    Idle,
    /// Pulling and scanning batches
    Scanning,
    /// The record was just persisted
    Checkpointed,
    /// The corpus is exhausted
    Done,
    /// Stopped at a batch boundary on request
    Cancelled,
}

impl DiscoveryState {
    /// Get a string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryState::Idle => "idle",
            DiscoveryState::Scanning => "scanning",
            DiscoveryState::Checkpointed => "checkpointed",
            DiscoveryState::Done => "done",
            DiscoveryState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DiscoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a call to [`Discoverer::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStatus {
    /// The corpus was exhausted
    Completed,
    /// The cancel flag was raised
    Cancelled,
    /// The per-run batch limit was reached; a later run resumes
    BatchLimitReached,
}

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryOutcome {
    pub status: DiscoveryStatus,
    /// Batches scanned during this run
    pub batches: u64,
    /// Rows scanned during this run
    pub rows_scanned: u64,
    /// Rows skipped during this run
    pub rows_skipped: u64,
    /// Whether the run started from a saved checkpoint
    pub resumed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<PathBuf>,
}

/// Progress snapshot passed to the progress callback after every batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryProgress {
    pub batch: u64,
    pub rows_consumed: u64,
    pub processed_count: u64,
    pub skipped_rows: u64,
    pub unique_patterns: usize,
    pub total_rows: Option<u64>,
}

/// Callback invoked after each batch.
pub type ProgressCallback = Box<dyn Fn(&DiscoveryProgress) + Send + Sync>;

/// Cooperative cancellation signal, checked at batch boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Batch-oriented, checkpointing corpus scanner.
pub struct Discoverer {
    config: DiscoveryConfig,
    store: Option<CheckpointStore>,
    record: DiscoveryRecord,
    state: DiscoveryState,
    resumed: bool,
    cancel: CancelFlag,
    batch_limit: Option<u64>,
    progress: Option<ProgressCallback>,
}

impl fmt::Debug for Discoverer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discoverer")
            .field("state", &self.state)
            .field("checkpoint", &self.store.as_ref().map(|s| s.path()))
            .field("processed_count", &self.record.processed_count)
            .field("batch_limit", &self.batch_limit)
            .finish()
    }
}

impl Discoverer {
    /// Create a discoverer. A checkpoint store is attached when the
    /// configuration names a checkpoint path.
    pub fn new(config: DiscoveryConfig) -> Self {
        let store = config.checkpoint_path.as_ref().map(|path| {
            CheckpointStore::new(path).with_retry_policy(RetryPolicy::from(&config.retry))
        });
        Self {
            config,
            store,
            record: DiscoveryRecord::new(),
            state: DiscoveryState::Idle,
            resumed: false,
            cancel: CancelFlag::new(),
            batch_limit: None,
            progress: None,
        }
    }

    /// Use an explicit checkpoint store.
    pub fn with_store(mut self, store: CheckpointStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Share a cancel flag with the caller.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = flag;
        self
    }

    /// Stop after this many batches in a single run.
    pub fn with_batch_limit(mut self, batches: u64) -> Self {
        self.batch_limit = Some(batches);
        self
    }

    /// Report progress after every batch.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DiscoveryProgress) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// The cancel flag checked by this discoverer.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    /// The record accumulated so far.
    pub fn record(&self) -> &DiscoveryRecord {
        &self.record
    }

    /// Consume the discoverer, keeping its record.
    pub fn into_record(self) -> DiscoveryRecord {
        self.record
    }

    fn transition(&mut self, next: DiscoveryState) {
        if self.state != next {
            info!(from = %self.state, to = %next, "Discovery state change");
            self.state = next;
        }
    }

    /// Load the checkpoint, if any, and leave the `Idle` state.
    ///
    /// Does nothing once a record has been loaded.
    pub async fn resume(&mut self) -> Result<()> {
        if self.state != DiscoveryState::Idle {
            return Ok(());
        }
        if let Some(store) = &self.store
            && let Some(record) = store.load().await?
        {
            info!(
                path = %store.path().display(),
                processed = record.processed_count,
                batch = record.current_batch,
                "Resuming discovery from checkpoint"
            );
            self.record = record;
            self.resumed = true;
        }
        self.transition(DiscoveryState::Scanning);
        Ok(())
    }

    async fn checkpoint(&mut self) -> Result<()> {
        if let Some(store) = &self.store {
            self.record.touch();
            store.save(&self.record).await?;
            self.transition(DiscoveryState::Checkpointed);
        }
        Ok(())
    }

    fn scan_batch(&mut self, batch: Vec<RowRead>) -> (u64, u64) {
        let radius = self.config.hint_radius;
        let (mut scanned, mut skipped) = (0, 0);

        for read in batch {
            let result = read.and_then(|row| scan_row(&mut self.record, &row, radius));
            match result {
                Ok(()) => scanned += 1,
                Err(e) => {
                    debug!("Skipping corpus row: {}", e);
                    self.record.skipped_rows += 1;
                    skipped += 1;
                }
            }
        }
        (scanned, skipped)
    }

    /// Scan the corpus from the current cursor until it is exhausted, the
    /// cancel flag is raised, or the batch limit is reached.
    ///
    /// The record is checkpointed every `checkpoint_every` batches and
    /// always before returning.
    pub async fn run(&mut self, corpus: &dyn CorpusSource) -> Result<DiscoveryOutcome> {
        self.resume().await?;
        if self.state == DiscoveryState::Done || self.state == DiscoveryState::Cancelled {
            self.transition(DiscoveryState::Scanning);
        }

        let batch_size = self.config.batch_size.max(1);
        let checkpoint_every = self.config.checkpoint_every.max(1) as u64;
        let total_rows = corpus.len_hint();

        let mut outcome = DiscoveryOutcome {
            status: DiscoveryStatus::Completed,
            batches: 0,
            rows_scanned: 0,
            rows_skipped: 0,
            resumed: self.resumed,
            checkpoint: self.store.as_ref().map(|s| s.path().to_path_buf()),
        };
        let mut since_checkpoint = 0;

        loop {
            if self.cancel.is_cancelled() {
                outcome.status = DiscoveryStatus::Cancelled;
                break;
            }
            if let Some(limit) = self.batch_limit
                && outcome.batches >= limit
            {
                outcome.status = DiscoveryStatus::BatchLimitReached;
                break;
            }

            let offset = self.record.rows_consumed();
            let batch = corpus.fetch_batch(offset, batch_size).await?;
            if batch.is_empty() {
                break;
            }
            self.transition(DiscoveryState::Scanning);

            let (scanned, skipped) = self.scan_batch(batch);
            self.record.current_batch += 1;
            outcome.batches += 1;
            outcome.rows_scanned += scanned;
            outcome.rows_skipped += skipped;
            since_checkpoint += 1;

            if skipped > 0 {
                info!(
                    batch = self.record.current_batch,
                    skipped, "Skipped malformed corpus rows"
                );
            }

            if let Some(callback) = &self.progress {
                callback(&DiscoveryProgress {
                    batch: self.record.current_batch,
                    rows_consumed: self.record.rows_consumed(),
                    processed_count: self.record.processed_count,
                    skipped_rows: self.record.skipped_rows,
                    unique_patterns: self.record.unique_patterns.len(),
                    total_rows,
                });
            }

            if since_checkpoint >= checkpoint_every {
                self.checkpoint().await?;
                since_checkpoint = 0;
            }
        }

        self.checkpoint().await?;
        self.transition(match outcome.status {
            DiscoveryStatus::Completed => DiscoveryState::Done,
            DiscoveryStatus::Cancelled => DiscoveryState::Cancelled,
            DiscoveryStatus::BatchLimitReached => DiscoveryState::Checkpointed,
        });

        info!(
            status = ?outcome.status,
            batches = outcome.batches,
            scanned = outcome.rows_scanned,
            skipped = outcome.rows_skipped,
            processed_total = self.record.processed_count,
            unique = self.record.unique_patterns.len(),
            "Discovery run finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{CorpusRow, MemoryCorpus};
    use std::sync::Mutex;

    fn corpus(rows: usize) -> MemoryCorpus {
        MemoryCorpus::new(
            (0..rows)
                .map(|i| CorpusRow::new(i.to_string(), "Ticket", format!("TS-{} opened", 1_000_000 + i)))
                .collect(),
        )
    }

    fn config(batch_size: usize, checkpoint: Option<PathBuf>) -> DiscoveryConfig {
        DiscoveryConfig {
            batch_size,
            checkpoint_path: checkpoint,
            ..DiscoveryConfig::default()
        }
    }

    #[tokio::test]
    async fn test_run_without_checkpoint_completes() {
        let mut discoverer = Discoverer::new(config(3, None));
        assert_eq!(discoverer.state(), DiscoveryState::Idle);

        let outcome = discoverer.run(&corpus(7)).await.unwrap();
        assert_eq!(outcome.status, DiscoveryStatus::Completed);
        assert_eq!(outcome.batches, 3);
        assert_eq!(outcome.rows_scanned, 7);
        assert_eq!(discoverer.state(), DiscoveryState::Done);
        assert_eq!(discoverer.record().current_batch, 3);
        assert_eq!(discoverer.record().total_occurrences("upper_dash_number"), 7);
    }

    #[tokio::test]
    async fn test_missing_bodies_are_skipped() {
        let mut rows = corpus(4);
        rows.push(CorpusRow {
            id: "x".into(),
            subject: Some("subject only".into()),
            body: None,
        });
        let mut discoverer = Discoverer::new(config(10, None));
        let outcome = discoverer.run(&rows).await.unwrap();
        assert_eq!(outcome.rows_scanned, 4);
        assert_eq!(outcome.rows_skipped, 1);
        assert_eq!(discoverer.record().skipped_rows, 1);
    }

    #[tokio::test]
    async fn test_cancelled_run_checkpoints_before_returning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");

        let flag = CancelFlag::new();
        let trigger = flag.clone();
        let mut discoverer = Discoverer::new(config(2, Some(path.clone())))
            .with_cancel_flag(flag)
            .on_progress(move |progress| {
                if progress.batch == 2 {
                    trigger.cancel();
                }
            });

        let outcome = discoverer.run(&corpus(10)).await.unwrap();
        assert_eq!(outcome.status, DiscoveryStatus::Cancelled);
        assert_eq!(outcome.batches, 2);
        assert_eq!(discoverer.state(), DiscoveryState::Cancelled);

        let saved = CheckpointStore::new(&path).load().await.unwrap().unwrap();
        assert_eq!(saved.processed_count, 4);
        assert_eq!(saved.current_batch, 2);
    }

    #[tokio::test]
    async fn test_progress_callback_sees_every_batch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut discoverer = Discoverer::new(config(4, None)).on_progress(move |progress| {
            sink.lock().unwrap().push(progress.rows_consumed);
        });
        discoverer.run(&corpus(10)).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![4, 8, 10]);
    }

    #[tokio::test]
    async fn test_batch_limit_then_resume() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");

        let mut first = Discoverer::new(config(2, Some(path.clone()))).with_batch_limit(2);
        let outcome = first.run(&corpus(9)).await.unwrap();
        assert_eq!(outcome.status, DiscoveryStatus::BatchLimitReached);
        assert!(!outcome.resumed);

        let mut second = Discoverer::new(config(2, Some(path)));
        let outcome = second.run(&corpus(9)).await.unwrap();
        assert!(outcome.resumed);
        assert_eq!(outcome.status, DiscoveryStatus::Completed);
        assert_eq!(outcome.rows_scanned, 5);
        assert_eq!(second.record().processed_count, 9);
    }
}
