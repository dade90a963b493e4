//! Traits for pattern extraction.

use super::ExtractionResult;

/// Trait for extracting identifier candidates from text.
///
/// Implementations hold only read-only state after construction, so a single
/// extractor can be shared across threads.
pub trait PatternExtractor: Send + Sync + std::fmt::Debug {
    /// Extract candidates from the given text.
    ///
    /// Never fails: empty or unusable input yields an empty result.
    fn extract(&self, text: &str) -> ExtractionResult;

    /// Get the name of this extractor for identification purposes.
    fn name(&self) -> &str;

    /// Extract from several texts in order.
    fn extract_all(&self, texts: &[&str]) -> Vec<ExtractionResult> {
        texts.iter().map(|text| self.extract(text)).collect()
    }
}
