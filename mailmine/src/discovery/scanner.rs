//! Pure scanning functions over a [`DiscoveryRecord`].
//!
//! Scanning never touches shared state, so independent corpus shards can be
//! scanned into separate records and merged once every shard has finished.

use super::hints::hint_labels;
use super::{CorpusReadError, CorpusRow, DiscoveryRecord};
use crate::noise::markup_noise;
use crate::templates::TemplateSet;
use crate::util::CharIndex;
use crate::{MailmineError, Result};
use tracing::debug;

/// Count every generic template match in `text` into `record`.
///
/// Colour digits and style declarations are left out of the counts.
///
/// Classification hints are taken from `hint_radius` characters either side
/// of each match.
pub fn scan_text(record: &mut DiscoveryRecord, text: &str, hint_radius: usize) {
    if text.trim().is_empty() {
        return;
    }
    let index = CharIndex::new(text);

    for template in TemplateSet::generic().iter() {
        for m in template.regex.find_iter(text) {
            if markup_noise(text, m.start(), m.end()).is_some() {
                continue;
            }
            let value = m.as_str();
            record.record_match(template.id, value);

            let window = index.window(m.start(), m.end(), hint_radius);
            for label in hint_labels(window) {
                record.record_hint(value, label);
            }
        }
    }
}

/// Scan one corpus row, counting it as processed.
///
/// A row without a body is rejected and left uncounted; the caller decides
/// whether to tally it as skipped.
pub fn scan_row(
    record: &mut DiscoveryRecord,
    row: &CorpusRow,
    hint_radius: usize,
) -> std::result::Result<(), CorpusReadError> {
    if row.body.is_none() {
        return Err(CorpusReadError::MissingBody { id: row.id.clone() });
    }
    scan_text(record, &row.text(), hint_radius);
    record.processed_count += 1;
    Ok(())
}

fn scan_shard(rows: &[CorpusRow], hint_radius: usize) -> DiscoveryRecord {
    let mut record = DiscoveryRecord::new();
    for row in rows {
        if let Err(e) = scan_row(&mut record, row, hint_radius) {
            debug!("Skipping corpus row: {}", e);
            record.skipped_rows += 1;
        }
    }
    record.current_batch = 1;
    record.touch();
    record
}

/// Scan shards on the blocking thread pool and merge the results.
///
/// The merge only starts after every shard has completed.
pub async fn discover_shards(shards: Vec<Vec<CorpusRow>>, hint_radius: usize) -> Result<DiscoveryRecord> {
    let handles: Vec<_> = shards
        .into_iter()
        .map(|rows| tokio::task::spawn_blocking(move || scan_shard(&rows, hint_radius)))
        .collect();

    let mut partials = Vec::with_capacity(handles.len());
    for handle in handles {
        let partial = handle
            .await
            .map_err(|e| MailmineError::Task(e.to_string()))?;
        partials.push(partial);
    }

    let mut merged = DiscoveryRecord::new();
    for partial in partials {
        merged.merge(partial);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_text_counts_and_hints() {
        let mut record = DiscoveryRecord::new();
        scan_text(&mut record, "Ticket TS-1818562 opened. Follow-up on TS-1818562.", 50);
        assert_eq!(record.count_of("upper_dash_number", "TS-1818562"), 2);
        assert!(record.unique_patterns.contains("TS-1818562"));
        assert_eq!(record.dominant_hint("TS-1818562"), Some("ticket"));
    }

    #[test]
    fn test_scan_text_skips_markup_noise() {
        let mut record = DiscoveryRecord::new();
        scan_text(&mut record, r#"<td style="border-color:#A1B2C3">Quote WQ-1234567</td>"#, 50);
        assert_eq!(record.count_of("mixed_alnum", "A1B2C3"), 0);
        assert_eq!(record.count_of("lower_hyphen_word", "border-color"), 0);
        assert!(record.unique_patterns.contains("WQ-1234567"));
    }

    #[test]
    fn test_scan_text_ignores_blank_input() {
        let mut record = DiscoveryRecord::new();
        scan_text(&mut record, "   \n\t", 50);
        assert!(record.patterns_found.is_empty());
    }

    #[test]
    fn test_scan_row_rejects_missing_body() {
        let mut record = DiscoveryRecord::new();
        let row = CorpusRow {
            id: "7".into(),
            subject: Some("PO 4500012345".into()),
            body: None,
        };
        assert!(matches!(
            scan_row(&mut record, &row, 50),
            Err(CorpusReadError::MissingBody { .. })
        ));
        assert_eq!(record.processed_count, 0);
        assert!(record.patterns_found.is_empty());
    }

    #[tokio::test]
    async fn test_sharded_scan_matches_sequential_scan() {
        let rows: Vec<CorpusRow> = (0..12)
            .map(|i| CorpusRow::new(i.to_string(), "Quote", format!("WQ-{} for PO 45{:08}", 1000 + i, i)))
            .collect();

        let mut sequential = DiscoveryRecord::new();
        for row in &rows {
            scan_row(&mut sequential, row, 50).unwrap();
        }

        let shards = vec![rows[..5].to_vec(), rows[5..].to_vec()];
        let merged = discover_shards(shards, 50).await.unwrap();

        assert_eq!(merged.patterns_found, sequential.patterns_found);
        assert_eq!(merged.classification_hints, sequential.classification_hints);
        assert_eq!(merged.processed_count, 12);
    }
}
