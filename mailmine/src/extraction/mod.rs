//! Per-message identifier extraction.
//!
//! Verified rules and the generic templates both run over the text. Every
//! candidate is scored, noise is dropped, candidates with the same value at
//! the same position are merged, and the survivors are returned in position
//! order together with a by-structure grouping and the high-confidence
//! subset.

mod confidence;
mod dedup;
mod extractor;
mod index;
mod traits;
mod types;

pub use confidence::{rule_confidence, tier_confidence};
pub use dedup::merge_candidates;
pub use extractor::{ExtractorBuilder, UniversalExtractor};
pub use index::DiscoveryIndex;
pub use traits::PatternExtractor;
pub use types::{CandidateMatch, ExtractionResult, MatchSource};

use crate::discovery::DiscoveryRecord;
use crate::rules::RuleLibrary;

/// Extract candidates from `text` with default settings.
///
/// Builds a one-off extractor; reuse a [`UniversalExtractor`] when
/// extracting from many texts.
pub fn extract(text: &str, rules: &RuleLibrary, discovery: Option<&DiscoveryRecord>) -> ExtractionResult {
    let mut builder = UniversalExtractor::builder().rules(rules.clone());
    if let Some(record) = discovery {
        builder = builder.discovery(record);
    }
    builder.build().extract(text)
}
