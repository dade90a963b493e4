//! The universal pattern extractor.

use super::confidence::{rule_confidence, tier_confidence};
use super::dedup::merge_candidates;
use super::{CandidateMatch, DiscoveryIndex, ExtractionResult, MatchSource, PatternExtractor};
use crate::config::ExtractionConfig;
use crate::discovery::DiscoveryRecord;
use crate::noise::NoiseClassifier;
use crate::rules::RuleLibrary;
use crate::structure::structure_of;
use crate::templates::TemplateSet;
use crate::util::{CharIndex, normalize_whitespace, truncate_on_char_boundary};
use std::sync::Arc;
use tracing::{debug, warn};

/// Extracts identifiers with verified rules and generic templates.
///
/// All state is loaded at construction and read-only afterwards; `extract`
/// performs no I/O.
#[derive(Debug, Clone)]
pub struct UniversalExtractor {
    rules: Arc<RuleLibrary>,
    discovery: Option<Arc<DiscoveryIndex>>,
    config: ExtractionConfig,
    noise: NoiseClassifier,
}

/// Builder for [`UniversalExtractor`].
#[derive(Debug, Default)]
pub struct ExtractorBuilder {
    rules: Option<Arc<RuleLibrary>>,
    discovery: Option<Arc<DiscoveryIndex>>,
    config: Option<ExtractionConfig>,
    noise: Option<NoiseClassifier>,
}

impl ExtractorBuilder {
    /// Start a builder with the built-in rules and default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this rule library.
    pub fn rules(mut self, rules: impl Into<Arc<RuleLibrary>>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Score structural matches with discovery evidence.
    pub fn discovery(mut self, record: &DiscoveryRecord) -> Self {
        self.discovery = Some(Arc::new(DiscoveryIndex::from_record(record)));
        self
    }

    /// Use an already built discovery index.
    pub fn discovery_index(mut self, index: Arc<DiscoveryIndex>) -> Self {
        self.discovery = Some(index);
        self
    }

    /// Set the extraction configuration.
    pub fn config(mut self, config: ExtractionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the noise classifier.
    pub fn noise(mut self, noise: NoiseClassifier) -> Self {
        self.noise = Some(noise);
        self
    }

    /// Build the extractor.
    pub fn build(self) -> UniversalExtractor {
        UniversalExtractor {
            rules: self.rules.unwrap_or_else(|| Arc::new(RuleLibrary::builtin())),
            discovery: self.discovery,
            config: self.config.unwrap_or_default(),
            noise: self.noise.unwrap_or_default(),
        }
    }
}

impl UniversalExtractor {
    /// Create a builder.
    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    /// An extractor over the built-in rules with default settings.
    pub fn with_defaults() -> Self {
        ExtractorBuilder::new().build()
    }

    /// The loaded rule library.
    pub fn rules(&self) -> &RuleLibrary {
        &self.rules
    }

    /// The extraction configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Whether discovery evidence is loaded.
    pub fn has_discovery(&self) -> bool {
        self.discovery.is_some()
    }

    fn rule_candidates(&self, text: &str, index: &CharIndex<'_>, out: &mut Vec<CandidateMatch>) {
        for rule in self.rules.rules() {
            for m in rule.regex.find_iter(text) {
                let value = m.as_str();
                if self.noise.is_noise_at(text, m.start(), m.end(), self.noise.min_length()) {
                    continue;
                }
                let window = normalize_whitespace(index.window(
                    m.start(),
                    m.end(),
                    self.config.context_radius,
                ));
                let confidence = rule_confidence(
                    rule.base_confidence,
                    &rule.context_keywords,
                    &window,
                    self.config.keyword_boost,
                );
                out.push(CandidateMatch {
                    value: value.to_string(),
                    structure: structure_of(value),
                    position: index.char_offset(m.start()),
                    end: index.char_offset(m.end()),
                    source_regex_id: rule.id.clone(),
                    source: MatchSource::Rule,
                    category: Some(rule.category),
                    hint: None,
                    context_window: window,
                    confidence,
                    alternates: Vec::new(),
                });
            }
        }
    }

    fn template_candidates(&self, text: &str, index: &CharIndex<'_>, out: &mut Vec<CandidateMatch>) {
        let base = self.config.structural_base_confidence;

        for template in TemplateSet::generic().iter() {
            for m in template.regex.find_iter(text) {
                let value = m.as_str();
                if self.noise.is_noise_at(text, m.start(), m.end(), self.config.structural_min_length) {
                    continue;
                }
                let structure = structure_of(value);
                let (confidence, hint) = match &self.discovery {
                    Some(discovery) => (
                        tier_confidence(
                            discovery.structure_count(template.id, &structure),
                            &self.config.confidence_tiers,
                            base,
                        ),
                        discovery.dominant_hint(template.id, &structure).map(str::to_string),
                    ),
                    None => (base, None),
                };
                out.push(CandidateMatch {
                    value: value.to_string(),
                    structure,
                    position: index.char_offset(m.start()),
                    end: index.char_offset(m.end()),
                    source_regex_id: template.id.to_string(),
                    source: MatchSource::Template,
                    category: None,
                    hint,
                    context_window: normalize_whitespace(index.window(
                        m.start(),
                        m.end(),
                        self.config.context_radius,
                    )),
                    confidence,
                    alternates: Vec::new(),
                });
            }
        }
    }
}

impl PatternExtractor for UniversalExtractor {
    fn extract(&self, text: &str) -> ExtractionResult {
        if text.trim().is_empty() {
            debug!("Empty input, nothing to extract");
            return ExtractionResult::empty();
        }

        let truncated = text.len() > self.config.max_input_bytes;
        let text = if truncated {
            warn!(
                bytes = text.len(),
                limit = self.config.max_input_bytes,
                "Input exceeds the extraction limit, truncating"
            );
            truncate_on_char_boundary(text, self.config.max_input_bytes)
        } else {
            text
        };

        let index = CharIndex::new(text);
        let mut candidates = Vec::new();
        self.rule_candidates(text, &index, &mut candidates);
        if self.config.include_structural {
            self.template_candidates(text, &index, &mut candidates);
        }

        let mut result = ExtractionResult::new(
            merge_candidates(candidates),
            self.config.high_confidence_threshold,
        );
        result.truncated = truncated;
        result
    }

    fn name(&self) -> &str {
        "universal"
    }
}
