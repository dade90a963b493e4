//! Corpus adapters.
//!
//! The discoverer only needs `(id, subject, body)` rows in a stable order.
//! Normalising the many shapes real mail exports come in is left to whoever
//! produces the rows.

use super::CorpusReadError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::sync::Mutex;
use tracing::debug;

/// One message from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRow {
    /// Stable identifier
    pub id: String,
    /// Subject line, if any
    #[serde(default)]
    pub subject: Option<String>,
    /// Message body, if any
    #[serde(default)]
    pub body: Option<String>,
}

impl CorpusRow {
    /// Create a row with both subject and body.
    pub fn new(id: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: Some(subject.into()),
            body: Some(body.into()),
        }
    }

    /// Subject and body joined by a newline.
    pub fn text(&self) -> String {
        match (&self.subject, &self.body) {
            (Some(subject), Some(body)) => format!("{}\n{}", subject, body),
            (Some(subject), None) => subject.clone(),
            (None, Some(body)) => body.clone(),
            (None, None) => String::new(),
        }
    }
}

/// A row, or the reason it could not be decoded.
pub type RowRead = Result<CorpusRow, CorpusReadError>;

/// A source of corpus rows in a stable order.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Fetch up to `limit` rows starting at row `offset`.
    ///
    /// An empty batch means the corpus is exhausted. Undecodable rows are
    /// returned in place as errors so the caller can skip them without
    /// losing its position.
    async fn fetch_batch(&self, offset: u64, limit: usize) -> Result<Vec<RowRead>, CorpusReadError>;

    /// Total number of rows, when cheaply known.
    fn len_hint(&self) -> Option<u64> {
        None
    }
}

/// An in-memory corpus.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    rows: Vec<CorpusRow>,
}

impl MemoryCorpus {
    /// Create a corpus over the given rows.
    pub fn new(rows: Vec<CorpusRow>) -> Self {
        Self { rows }
    }

    /// Build a corpus from body texts, numbering ids from zero.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = texts
            .into_iter()
            .enumerate()
            .map(|(i, body)| CorpusRow {
                id: i.to_string(),
                subject: None,
                body: Some(body.into()),
            })
            .collect();
        Self { rows }
    }

    /// Add a row at the end.
    pub fn push(&mut self, row: CorpusRow) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the corpus has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Split into `shards` contiguous corpora of near-equal size.
    pub fn shards(&self, shards: usize) -> Vec<Vec<CorpusRow>> {
        let shards = shards.max(1);
        let size = self.rows.len().div_ceil(shards).max(1);
        self.rows.chunks(size).map(<[CorpusRow]>::to_vec).collect()
    }
}

#[async_trait]
impl CorpusSource for MemoryCorpus {
    async fn fetch_batch(&self, offset: u64, limit: usize) -> Result<Vec<RowRead>, CorpusReadError> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(self.rows.len());
        let end = start.saturating_add(limit).min(self.rows.len());
        Ok(self.rows[start..end].iter().cloned().map(Ok).collect())
    }

    fn len_hint(&self) -> Option<u64> {
        Some(self.rows.len() as u64)
    }
}

struct LineCursor {
    lines: Lines<BufReader<File>>,
    next_line: u64,
}

/// A corpus stored as one JSON object per line.
///
/// Line order is the stable key order. Sequential batches continue from an
/// open reader; a request for any other offset reopens the file and skips
/// ahead.
pub struct JsonLinesCorpus {
    path: PathBuf,
    cursor: Mutex<Option<LineCursor>>,
}

impl std::fmt::Debug for JsonLinesCorpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesCorpus")
            .field("path", &self.path)
            .finish()
    }
}

impl JsonLinesCorpus {
    /// Open a JSON Lines corpus. Fails if the file cannot be read.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, CorpusReadError> {
        let path = path.as_ref().to_path_buf();
        // Fail early on a missing or unreadable file
        tokio::fs::metadata(&path).await?;
        Ok(Self {
            path,
            cursor: Mutex::new(None),
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn reopen(&self) -> Result<LineCursor, CorpusReadError> {
        let file = File::open(&self.path).await?;
        Ok(LineCursor {
            lines: BufReader::new(file).lines(),
            next_line: 0,
        })
    }

    fn parse_line(line_number: u64, line: &str) -> RowRead {
        if line.trim().is_empty() {
            return Err(CorpusReadError::Malformed {
                line: line_number,
                reason: "empty line".to_string(),
            });
        }
        serde_json::from_str::<CorpusRow>(line).map_err(|e| CorpusReadError::Malformed {
            line: line_number,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl CorpusSource for JsonLinesCorpus {
    async fn fetch_batch(&self, offset: u64, limit: usize) -> Result<Vec<RowRead>, CorpusReadError> {
        let mut guard = self.cursor.lock().await;

        let mut cursor = match guard.take() {
            Some(cursor) if cursor.next_line == offset => cursor,
            _ => {
                debug!(path = %self.path.display(), offset, "Opening corpus reader");
                self.reopen().await?
            }
        };

        while cursor.next_line < offset {
            match cursor.lines.next_line().await {
                Ok(Some(_)) => {}
                Ok(None) => return Ok(Vec::new()),
                // Already counted as skipped by the run that first read it
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {}
                Err(e) => return Err(e.into()),
            }
            cursor.next_line += 1;
        }

        let mut rows = Vec::with_capacity(limit);
        while rows.len() < limit {
            match cursor.lines.next_line().await {
                Ok(Some(line)) => {
                    cursor.next_line += 1;
                    rows.push(Self::parse_line(cursor.next_line, &line));
                }
                Ok(None) => break,
                // Invalid UTF-8 consumes the line; report it as a bad row
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    cursor.next_line += 1;
                    rows.push(Err(CorpusReadError::Malformed {
                        line: cursor.next_line,
                        reason: e.to_string(),
                    }));
                }
                Err(e) => return Err(e.into()),
            }
        }

        *guard = Some(cursor);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_text_joins_subject_and_body() {
        let row = CorpusRow::new("1", "Quote WQ-1", "See attached");
        assert_eq!(row.text(), "Quote WQ-1\nSee attached");

        let body_only = CorpusRow {
            id: "2".into(),
            subject: None,
            body: Some("only body".into()),
        };
        assert_eq!(body_only.text(), "only body");
    }

    #[tokio::test]
    async fn test_memory_corpus_batches() {
        let corpus = MemoryCorpus::from_texts(["a", "b", "c"]);
        let first = corpus.fetch_batch(0, 2).await.unwrap();
        let rest = corpus.fetch_batch(2, 2).await.unwrap();
        let past_end = corpus.fetch_batch(10, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(rest.len(), 1);
        assert!(past_end.is_empty());
        assert_eq!(corpus.len_hint(), Some(3));
    }

    #[test]
    fn test_memory_corpus_shards_cover_all_rows() {
        let corpus = MemoryCorpus::from_texts((0..10).map(|i| format!("row {}", i)));
        let shards = corpus.shards(3);
        assert_eq!(shards.len(), 3);
        assert_eq!(shards.iter().map(Vec::len).sum::<usize>(), 10);
    }

    #[tokio::test]
    async fn test_json_lines_corpus_reports_bad_lines_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.jsonl");
        std::fs::write(
            &path,
            concat!(
                r#"{"id":"1","subject":"Quote","body":"WQ-1234567"}"#,
                "\n",
                "not json\n",
                r#"{"id":"3","body":"Ticket TS-1818562"}"#,
                "\n",
            ),
        )
        .unwrap();

        let corpus = JsonLinesCorpus::open(&path).await.unwrap();
        let batch = corpus.fetch_batch(0, 10).await.unwrap();
        assert_eq!(batch.len(), 3);
        assert!(batch[0].is_ok());
        assert!(matches!(batch[1], Err(CorpusReadError::Malformed { line: 2, .. })));
        assert_eq!(batch[2].as_ref().unwrap().id, "3");

        // Non-sequential offsets reopen the file
        let tail = corpus.fetch_batch(2, 10).await.unwrap();
        assert_eq!(tail.len(), 1);
        assert!(corpus.fetch_batch(3, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_lines_corpus_reopens_past_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.jsonl");
        let mut bytes = br#"{"id":"1","body":"PO 0505915850"}"#.to_vec();
        bytes.extend_from_slice(b"\n\xff\xfe broken\n");
        bytes.extend_from_slice(br#"{"id":"3","body":"Ticket TS-1818562"}"#);
        bytes.push(b'\n');
        std::fs::write(&path, bytes).unwrap();

        let corpus = JsonLinesCorpus::open(&path).await.unwrap();
        let tail = corpus.fetch_batch(2, 10).await.unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].as_ref().unwrap().id, "3");
    }

    #[tokio::test]
    async fn test_json_lines_corpus_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonLinesCorpus::open(dir.path().join("missing.jsonl")).await;
        assert!(matches!(result, Err(CorpusReadError::Io(_))));
    }
}
