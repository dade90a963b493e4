use crate::discovery::DiscoveryRecord;
use crate::structure::structure_of;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
struct ShapeStats {
    count: u64,
    hints: BTreeMap<String, u64>,
}

/// Discovery counts indexed for extraction-time lookup.
///
/// Counts are aggregated per template and structural signature, so a value
/// never seen during discovery still inherits the evidence for its shape.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryIndex {
    shapes: HashMap<String, HashMap<String, ShapeStats>>,
    processed_count: u64,
}

impl DiscoveryIndex {
    /// Index a discovery record.
    pub fn from_record(record: &DiscoveryRecord) -> Self {
        let mut shapes: HashMap<String, HashMap<String, ShapeStats>> = HashMap::new();

        for (pattern_type, values) in &record.patterns_found {
            let by_shape = shapes.entry(pattern_type.clone()).or_default();
            for (value, count) in values {
                let stats = by_shape.entry(structure_of(value)).or_default();
                stats.count += count;
                if let Some(labels) = record.classification_hints.get(value) {
                    for (label, n) in labels {
                        *stats.hints.entry(label.clone()).or_insert(0) += n;
                    }
                }
            }
        }

        Self {
            shapes,
            processed_count: record.processed_count,
        }
    }

    fn stats(&self, pattern_type: &str, structure: &str) -> Option<&ShapeStats> {
        self.shapes.get(pattern_type)?.get(structure)
    }

    /// Occurrences of a shape under a template.
    pub fn structure_count(&self, pattern_type: &str, structure: &str) -> u64 {
        self.stats(pattern_type, structure).map_or(0, |s| s.count)
    }

    /// Most frequent category label seen near a shape (ties alphabetical).
    pub fn dominant_hint(&self, pattern_type: &str, structure: &str) -> Option<&str> {
        let stats = self.stats(pattern_type, structure)?;
        stats
            .hints
            .iter()
            .fold(None, |best: Option<(&String, u64)>, (label, n)| match best {
                Some((_, best_n)) if best_n >= *n => best,
                _ => Some((label, *n)),
            })
            .map(|(label, _)| label.as_str())
    }

    /// Rows scanned by the indexed discovery run.
    pub fn processed_count(&self) -> u64 {
        self.processed_count
    }

    /// Whether the index holds no counts.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
