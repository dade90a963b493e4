use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Accumulated, resumable discovery statistics.
///
/// Serialized as the checkpoint document. Ordered maps keep the JSON output
/// deterministic, so saving the same record twice yields identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryRecord {
    /// Rows scanned successfully
    pub processed_count: u64,

    /// Batches completed
    pub current_batch: u64,

    /// Every distinct literal value ever matched
    pub unique_patterns: BTreeSet<String>,

    /// Template id → literal value → occurrence count
    pub patterns_found: BTreeMap<String, BTreeMap<String, u64>>,

    /// Literal value → category label → number of matches with that keyword nearby
    pub classification_hints: BTreeMap<String, BTreeMap<String, u64>>,

    /// Rows skipped as malformed
    pub skipped_rows: u64,

    /// When the record last changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DiscoveryRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Corpus rows consumed so far, skipped rows included.
    ///
    /// This is the offset at which a resumed run continues.
    pub fn rows_consumed(&self) -> u64 {
        self.processed_count + self.skipped_rows
    }

    /// Count one occurrence of `value` for a template.
    pub fn record_match(&mut self, pattern_type: &str, value: &str) {
        *self
            .patterns_found
            .entry(pattern_type.to_string())
            .or_default()
            .entry(value.to_string())
            .or_insert(0) += 1;
        if !self.unique_patterns.contains(value) {
            self.unique_patterns.insert(value.to_string());
        }
    }

    /// Count one co-occurrence of `label` near `value`.
    pub fn record_hint(&mut self, value: &str, label: &str) {
        *self
            .classification_hints
            .entry(value.to_string())
            .or_default()
            .entry(label.to_string())
            .or_insert(0) += 1;
    }

    /// Occurrence count of a value for a template.
    pub fn count_of(&self, pattern_type: &str, value: &str) -> u64 {
        self.patterns_found
            .get(pattern_type)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// Total occurrences counted for a template.
    pub fn total_occurrences(&self, pattern_type: &str) -> u64 {
        self.patterns_found
            .get(pattern_type)
            .map(|values| values.values().sum())
            .unwrap_or(0)
    }

    /// The most frequent label seen near a value (ties broken alphabetically).
    pub fn dominant_hint(&self, value: &str) -> Option<&str> {
        self.classification_hints.get(value).and_then(|labels| {
            labels
                .iter()
                .fold(None, |best: Option<(&String, u64)>, (label, count)| match best {
                    Some((_, best_count)) if best_count >= *count => best,
                    _ => Some((label, *count)),
                })
                .map(|(label, _)| label.as_str())
        })
    }

    /// Fold another record into this one.
    ///
    /// Counts and cursors are summed and sets are unioned, so merging is
    /// commutative and associative over shard records.
    pub fn merge(&mut self, other: DiscoveryRecord) {
        self.processed_count += other.processed_count;
        self.current_batch += other.current_batch;
        self.skipped_rows += other.skipped_rows;
        self.unique_patterns.extend(other.unique_patterns);

        for (pattern_type, values) in other.patterns_found {
            let target = self.patterns_found.entry(pattern_type).or_default();
            for (value, count) in values {
                *target.entry(value).or_insert(0) += count;
            }
        }

        for (value, labels) in other.classification_hints {
            let target = self.classification_hints.entry(value).or_default();
            for (label, count) in labels {
                *target.entry(label).or_insert(0) += count;
            }
        }

        self.updated_at = match (self.updated_at, other.updated_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    /// Mark the record as changed now.
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Whether nothing has been scanned yet.
    pub fn is_empty(&self) -> bool {
        self.rows_consumed() == 0 && self.patterns_found.is_empty()
    }
}
