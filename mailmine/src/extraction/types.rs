use crate::rules::EntityCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// A verified rule
    Rule,
    /// A generic structural template
    Template,
}

/// A single occurrence of a pattern in text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    /// Matched substring, case as found
    pub value: String,
    /// Structural signature of `value`
    pub structure: String,
    /// Character offset of the match start
    pub position: usize,
    /// Character offset one past the match end
    pub end: usize,
    /// Rule id (`category:label`) or template id
    pub source_regex_id: String,
    pub source: MatchSource,
    /// Category of the producing rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EntityCategory>,
    /// Most common category label seen near this shape during discovery
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whitespace-normalised text around the match
    pub context_window: String,
    pub confidence: f32,
    /// Other sources that produced the same value at the same position
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<String>,
}

impl CandidateMatch {
    /// Whether this candidate came from a verified rule.
    pub fn is_rule(&self) -> bool {
        self.source == MatchSource::Rule
    }
}

/// Aggregate extraction output for one text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Every candidate, in position order
    pub matches: Vec<CandidateMatch>,
    /// Candidates grouped by structural signature
    pub by_structure: BTreeMap<String, Vec<CandidateMatch>>,
    /// Candidates at or above the high confidence threshold
    pub high_confidence: Vec<CandidateMatch>,
    /// Whether the input was cut to the configured maximum length
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl ExtractionResult {
    /// Build the grouped views over position-ordered matches.
    pub fn new(matches: Vec<CandidateMatch>, high_confidence_threshold: f32) -> Self {
        let mut by_structure: BTreeMap<String, Vec<CandidateMatch>> = BTreeMap::new();
        for candidate in &matches {
            by_structure
                .entry(candidate.structure.clone())
                .or_default()
                .push(candidate.clone());
        }
        let high_confidence = matches
            .iter()
            .filter(|c| c.confidence >= high_confidence_threshold)
            .cloned()
            .collect();

        Self {
            matches,
            by_structure,
            high_confidence,
            truncated: false,
        }
    }

    /// An empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether nothing was found.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Matches produced by rules of one category.
    pub fn in_category(&self, category: EntityCategory) -> impl Iterator<Item = &CandidateMatch> {
        self.matches
            .iter()
            .filter(move |c| c.category == Some(category))
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
