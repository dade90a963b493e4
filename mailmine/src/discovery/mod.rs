//! Statistical pattern discovery.
//!
//! The discoverer scans a corpus in fixed-size batches, counts every match of
//! the generic templates, records which business keywords appear around each
//! value, and checkpoints its [`DiscoveryRecord`] so that a long campaign can
//! be interrupted and resumed at batch granularity. A [`DiscoveryReport`]
//! then filters the raw counts down to frequent, non-noise values and the
//! structural shapes they share.

mod checkpoint;
mod corpus;
mod discoverer;
mod hints;
mod record;
mod report;
mod scanner;

pub use checkpoint::{CheckpointStore, RetryPolicy};
pub use corpus::{CorpusRow, CorpusSource, JsonLinesCorpus, MemoryCorpus, RowRead};
pub use discoverer::{
    CancelFlag, DiscoveryOutcome, DiscoveryProgress, DiscoveryState, DiscoveryStatus,
    Discoverer, ProgressCallback,
};
pub use hints::{HINT_KEYWORDS, hint_labels};
pub use record::DiscoveryRecord;
pub use report::{DiscoveryReport, FrequentPattern, PatternTypeReport, StructuralPattern};
pub use scanner::{discover_shards, scan_row, scan_text};

use crate::config::DiscoveryConfig;
use crate::noise::NoiseClassifier;
use std::path::{Path, PathBuf};

/// Failure to persist or restore the discovery record.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    /// Reading or writing the checkpoint file failed
    #[error("checkpoint I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The checkpoint file exists but does not hold a discovery record
    #[error("checkpoint at {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Every retry failed; discovery progress would be lost
    #[error("checkpoint write to {} failed after {attempts} attempts: {last_error}", .path.display())]
    RetriesExhausted {
        path: PathBuf,
        attempts: u32,
        last_error: std::io::Error,
    },
}

/// Failure to read corpus rows.
///
/// Row-level variants are recovered by skipping the row. `Io` returned from
/// [`CorpusSource::fetch_batch`] itself ends the run.
#[derive(Debug, thiserror::Error)]
pub enum CorpusReadError {
    /// A row could not be decoded
    #[error("malformed corpus row at line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    /// A row has no body text
    #[error("corpus row {id} has no body")]
    MissingBody { id: String },

    /// The corpus itself could not be read
    #[error("corpus I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The result of a [`discover`] call.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// How the run ended
    pub outcome: DiscoveryOutcome,
    /// Full accumulated record, including values below the threshold
    pub record: DiscoveryRecord,
    /// Frequent and structural patterns at the requested threshold
    pub report: DiscoveryReport,
}

/// Run discovery over a corpus with default settings.
///
/// Resumes from `checkpoint_path` when it holds a record, checkpoints after
/// every batch, and reports patterns seen at least `min_frequency` times.
pub async fn discover(
    corpus: &dyn CorpusSource,
    checkpoint_path: Option<&Path>,
    min_frequency: u64,
) -> crate::Result<Discovery> {
    let config = DiscoveryConfig {
        checkpoint_path: checkpoint_path.map(Path::to_path_buf),
        min_frequency,
        ..DiscoveryConfig::default()
    };

    let mut discoverer = Discoverer::new(config.clone());
    let outcome = discoverer.run(corpus).await?;
    let record = discoverer.into_record();
    let report = DiscoveryReport::build(&record, &config, &NoiseClassifier::default());

    Ok(Discovery {
        outcome,
        record,
        report,
    })
}
