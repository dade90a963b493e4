use super::DiscoveryRecord;
use crate::config::DiscoveryConfig;
use crate::noise::NoiseClassifier;
use crate::structure::structure_of;
use crate::templates::TemplateSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A literal value seen often enough to report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentPattern {
    pub value: String,
    pub count: u64,
    pub structure: String,
    /// Most frequent category label seen near the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Frequent values for one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternTypeReport {
    pub pattern_type: String,
    pub total_occurrences: u64,
    pub distinct_values: usize,
    /// Highest count first, then by value
    pub frequent: Vec<FrequentPattern>,
}

/// A structural signature shared by several frequent values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralPattern {
    pub structure: String,
    pub distinct_values: usize,
    /// Sum over values of each value's highest per-template count
    pub total_count: u64,
    pub pattern_types: Vec<String>,
    pub samples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_hint: Option<String>,
}

/// Final discovery summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryReport {
    pub processed_count: u64,
    pub skipped_rows: u64,
    pub unique_patterns: usize,
    /// Effective minimum count applied to every value
    pub frequency_threshold: u64,
    pub pattern_types: Vec<PatternTypeReport>,
    /// Largest groups first, then by signature
    pub structural_patterns: Vec<StructuralPattern>,
}

#[derive(Default)]
struct StructureGroup {
    values: BTreeMap<String, u64>,
    pattern_types: BTreeSet<String>,
    hints: BTreeMap<String, u64>,
}

/// Threshold combining the absolute and the row-relative minimum.
fn frequency_threshold(record: &DiscoveryRecord, config: &DiscoveryConfig) -> u64 {
    let relative = (config.min_row_fraction * record.processed_count as f64).ceil() as u64;
    config.min_frequency.max(relative)
}

impl DiscoveryReport {
    /// Summarise a record.
    ///
    /// Values below the frequency threshold or classified as noise are
    /// dropped. The survivors are grouped by structural signature and a
    /// signature is reported only when it covers at least
    /// `min_distinct_per_structure` distinct values.
    pub fn build(record: &DiscoveryRecord, config: &DiscoveryConfig, noise: &NoiseClassifier) -> Self {
        let threshold = frequency_threshold(record, config);
        let mut pattern_types = Vec::new();
        let mut groups: BTreeMap<String, StructureGroup> = BTreeMap::new();

        for (pattern_type, values) in ordered_types(record) {
            let mut frequent: Vec<FrequentPattern> = values
                .iter()
                .filter(|(value, count)| **count >= threshold && !noise.is_noise(value))
                .map(|(value, count)| FrequentPattern {
                    value: value.clone(),
                    count: *count,
                    structure: structure_of(value),
                    hint: record.dominant_hint(value).map(str::to_string),
                })
                .collect();
            frequent.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

            for pattern in &frequent {
                let group = groups.entry(pattern.structure.clone()).or_default();
                let entry = group.values.entry(pattern.value.clone()).or_insert(0);
                *entry = (*entry).max(pattern.count);
                group.pattern_types.insert(pattern_type.clone());
                if let Some(hint) = &pattern.hint {
                    *group.hints.entry(hint.clone()).or_insert(0) += 1;
                }
            }

            pattern_types.push(PatternTypeReport {
                pattern_type: pattern_type.clone(),
                total_occurrences: values.values().sum(),
                distinct_values: values.len(),
                frequent,
            });
        }

        let min_distinct = config.min_distinct_per_structure.max(1);
        let mut structural_patterns: Vec<StructuralPattern> = groups
            .into_iter()
            .filter(|(_, group)| group.values.len() >= min_distinct)
            .map(|(structure, group)| {
                let mut by_count: Vec<(&String, &u64)> = group.values.iter().collect();
                by_count.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
                StructuralPattern {
                    structure,
                    distinct_values: group.values.len(),
                    total_count: group.values.values().sum(),
                    pattern_types: group.pattern_types.into_iter().collect(),
                    samples: by_count
                        .into_iter()
                        .take(config.structure_samples)
                        .map(|(value, _)| value.clone())
                        .collect(),
                    dominant_hint: group
                        .hints
                        .iter()
                        .fold(None, |best: Option<(&String, u64)>, (label, n)| match best {
                            Some((_, best_n)) if best_n >= *n => best,
                            _ => Some((label, *n)),
                        })
                        .map(|(label, _)| label.clone()),
                }
            })
            .collect();
        structural_patterns.sort_by(|a, b| {
            b.distinct_values
                .cmp(&a.distinct_values)
                .then_with(|| b.total_count.cmp(&a.total_count))
                .then_with(|| a.structure.cmp(&b.structure))
        });

        Self {
            processed_count: record.processed_count,
            skipped_rows: record.skipped_rows,
            unique_patterns: record.unique_patterns.len(),
            frequency_threshold: threshold,
            pattern_types,
            structural_patterns,
        }
    }

    /// Number of frequent values across all templates.
    pub fn frequent_count(&self) -> usize {
        self.pattern_types.iter().map(|t| t.frequent.len()).sum()
    }

    /// Look up a structural pattern by signature.
    pub fn structure(&self, signature: &str) -> Option<&StructuralPattern> {
        self.structural_patterns.iter().find(|p| p.structure == signature)
    }
}

/// Pattern types in template order, then any unknown keys alphabetically.
fn ordered_types(record: &DiscoveryRecord) -> Vec<(&String, &BTreeMap<String, u64>)> {
    let order = TemplateSet::generic().ids();
    let mut types: Vec<_> = record.patterns_found.iter().collect();
    types.sort_by_key(|(id, _)| {
        (
            order.iter().position(|known| *known == id.as_str()).unwrap_or(order.len()),
            (*id).clone(),
        )
    });
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min_frequency: u64) -> DiscoveryConfig {
        DiscoveryConfig {
            min_frequency,
            ..DiscoveryConfig::default()
        }
    }

    fn record_with(values: &[(&str, &str, u64)]) -> DiscoveryRecord {
        let mut record = DiscoveryRecord::new();
        for (pattern_type, value, count) in values {
            for _ in 0..*count {
                record.record_match(pattern_type, value);
            }
        }
        record.processed_count = 100;
        record
    }

    #[test]
    fn test_threshold_and_noise_filtering() {
        let record = record_with(&[
            ("upper_dash_number", "TS-1818562", 60),
            ("upper_dash_number", "TS-1000001", 10),
            ("lower_hyphen_word", "margin-top", 500),
        ]);
        let report = DiscoveryReport::build(&record, &config(50), &NoiseClassifier::default());

        assert_eq!(report.frequency_threshold, 50);
        assert_eq!(report.frequent_count(), 1);
        let dash = &report.pattern_types[0];
        assert_eq!(dash.pattern_type, "upper_dash_number");
        assert_eq!(dash.frequent[0].value, "TS-1818562");
        assert_eq!(dash.frequent[0].structure, "A-#");
        assert_eq!(dash.total_occurrences, 70);
    }

    #[test]
    fn test_relative_threshold_can_dominate() {
        let record = record_with(&[("long_number", "123456", 5)]);
        let mut cfg = config(1);
        cfg.min_row_fraction = 0.1;
        let report = DiscoveryReport::build(&record, &cfg, &NoiseClassifier::default());
        assert_eq!(report.frequency_threshold, 10);
        assert_eq!(report.frequent_count(), 0);
    }

    #[test]
    fn test_structural_grouping_needs_distinct_values() {
        let record = record_with(&[
            ("upper_dash_number", "XHU-00001", 3),
            ("upper_dash_number", "ZDW-00002", 2),
            ("upper_dash_number", "ABC-99999", 1),
            ("date_iso", "2024-01-15", 4),
        ]);
        let report = DiscoveryReport::build(&record, &config(1), &NoiseClassifier::default());

        let shape = report.structure("A-#").expect("A-# should be reported");
        assert_eq!(shape.distinct_values, 3);
        assert_eq!(shape.total_count, 6);
        assert_eq!(shape.samples, vec!["XHU-00001", "ZDW-00002", "ABC-99999"]);
        assert!(report.structure("#-#-#").is_none());
    }
}
