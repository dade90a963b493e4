//! Durable storage for the discovery record.
//!
//! Writes go to a sibling temporary file which is then renamed over the
//! checkpoint, so an interrupted write never leaves a half-written record
//! behind. Failed writes are retried with exponential backoff and become
//! fatal once the retry budget is spent.

use super::{CheckpointError, DiscoveryRecord};
use crate::config::RetryConfig;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Retry policy for checkpoint I/O
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Initial backoff duration in milliseconds
    pub initial_backoff_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f32,
    /// Maximum backoff duration in milliseconds
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff_ms: config.initial_backoff_ms,
            backoff_multiplier: config.backoff_multiplier,
            max_backoff_ms: config.max_backoff_ms,
        }
    }
}

impl RetryPolicy {
    /// Calculate backoff duration before the retry following `attempt` (zero-based)
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let backoff_ms =
            (self.initial_backoff_ms as f32 * self.backoff_multiplier.powi(attempt as i32)) as u64;
        Duration::from_millis(backoff_ms.min(self.max_backoff_ms))
    }
}

/// Reads and writes a [`DiscoveryRecord`] at a fixed path.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
    retry: RetryPolicy,
}

impl CheckpointStore {
    /// Create a store with the default retry policy.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            retry: RetryPolicy::default(),
        }
    }

    /// Set the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// The checkpoint path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "checkpoint".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Load the saved record, or `None` if no checkpoint exists yet.
    ///
    /// A file that exists but does not parse is an error: restarting from
    /// scratch would silently discard the campaign so far.
    pub async fn load(&self) -> Result<Option<DiscoveryRecord>, CheckpointError> {
        let mut last_error = None;

        for attempt in 0..self.retry.max_attempts {
            match tokio::fs::read(&self.path).await {
                Ok(bytes) => {
                    let record = serde_json::from_slice(&bytes).map_err(|source| {
                        CheckpointError::Corrupt {
                            path: self.path.clone(),
                            source,
                        }
                    })?;
                    debug!(path = %self.path.display(), "Loaded discovery checkpoint");
                    return Ok(Some(record));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => {
                    warn!(
                        "Checkpoint read failed (path: {}, attempt: {}/{}): {}",
                        self.path.display(),
                        attempt + 1,
                        self.retry.max_attempts,
                        e
                    );
                    last_error = Some(e);
                    if attempt + 1 < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.backoff_duration(attempt)).await;
                    }
                }
            }
        }

        Err(self.exhausted(last_error))
    }

    /// Persist the record, retrying failed writes.
    pub async fn save(&self, record: &DiscoveryRecord) -> Result<(), CheckpointError> {
        let bytes = serde_json::to_vec_pretty(record).map_err(|source| CheckpointError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut last_error = None;
        for attempt in 0..self.retry.max_attempts {
            match self.write_once(&bytes).await {
                Ok(()) => {
                    debug!(
                        path = %self.path.display(),
                        bytes = bytes.len(),
                        processed = record.processed_count,
                        "Wrote discovery checkpoint"
                    );
                    return Ok(());
                }
                Err(e) => {
                    if attempt + 1 < self.retry.max_attempts {
                        let backoff = self.retry.backoff_duration(attempt);
                        warn!(
                            "Checkpoint write failed (path: {}, attempt: {}/{}), retrying in {:?}: {}",
                            self.path.display(),
                            attempt + 1,
                            self.retry.max_attempts,
                            backoff,
                            e
                        );
                        last_error = Some(e);
                        tokio::time::sleep(backoff).await;
                    } else {
                        last_error = Some(e);
                    }
                }
            }
        }

        let err = self.exhausted(last_error);
        error!("{}", err);
        Err(err)
    }

    /// Remove the checkpoint, if present.
    pub async fn clear(&self) -> Result<(), CheckpointError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CheckpointError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    async fn write_once(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, &self.path).await
    }

    fn exhausted(&self, last_error: Option<std::io::Error>) -> CheckpointError {
        CheckpointError::RetriesExhausted {
            path: self.path.clone(),
            attempts: self.retry.max_attempts,
            last_error: last_error
                .unwrap_or_else(|| std::io::Error::other("no attempts were made")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            initial_backoff_ms: 1,
            backoff_multiplier: 2.0,
            max_backoff_ms: 5,
        }
    }

    #[test]
    fn test_backoff_is_exponential_and_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_duration(0), Duration::from_millis(100));
        assert_eq!(policy.backoff_duration(1), Duration::from_millis(200));
        assert_eq!(policy.backoff_duration(10), Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("nested").join("checkpoint.json"));
        assert!(store.load().await.unwrap().is_none());

        let mut record = DiscoveryRecord::new();
        record.record_match("upper_dash_number", "CAS-107073");
        record.record_hint("CAS-107073", "spa");
        record.processed_count = 1;
        record.current_batch = 1;
        record.touch();

        store.save(&record).await.unwrap();
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().await.unwrap(), Some(record.clone()));

        // Saving a loaded record again is stable
        store.save(&record).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_corrupt_checkpoint_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = CheckpointStore::new(&path);
        assert!(matches!(store.load().await, Err(CheckpointError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_unwritable_checkpoint_exhausts_retries() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected makes every write fail
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let store = CheckpointStore::new(blocker.join("checkpoint.json"))
            .with_retry_policy(fast_policy());
        let result = store.save(&DiscoveryRecord::new()).await;
        assert!(matches!(
            result,
            Err(CheckpointError::RetriesExhausted { attempts: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("checkpoint.json"));
        store.save(&DiscoveryRecord::new()).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
