//! Confidence scoring.

use crate::config::ConfidenceTier;
use crate::util::contains_word;

/// Map a discovery count to a confidence.
///
/// A tier applies when `count` is strictly greater than its `min_count`;
/// the highest applicable confidence wins and `base` is the floor. Taking
/// the maximum keeps the mapping monotonic in `count` whatever order the
/// tiers are listed in.
pub fn tier_confidence(count: u64, tiers: &[ConfidenceTier], base: f32) -> f32 {
    tiers
        .iter()
        .filter(|tier| count > tier.min_count)
        .map(|tier| tier.confidence)
        .fold(base, f32::max)
}

/// Rule confidence after the context keyword boost, capped at 1.0.
pub fn rule_confidence(base: f32, keywords: &[String], window: &str, boost: f32) -> f32 {
    let boosted = keywords.iter().any(|keyword| contains_word(window, keyword));
    if boosted {
        (base + boost).min(1.0)
    } else {
        base.min(1.0)
    }
}
