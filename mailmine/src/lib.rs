//! # Mailmine
//!
//! Pattern discovery and identifier extraction for business email corpora.
//! Mailmine finds recurring identifier shapes (purchase orders, quotes, SPAs,
//! support tickets, ...) in free-text email without prior domain knowledge,
//! and extracts them from individual messages with a confidence score.
//!
//! ## Quick Start
//!
//! ```rust
//! use mailmine::prelude::*;
//!
//! let rules = RuleLibrary::builtin();
//! let result = mailmine::extract(
//!     "Ticket TS-1818562 opened for CAS-107073-B4P8K8",
//!     &rules,
//!     None,
//! );
//!
//! for candidate in &result.high_confidence {
//!     println!("{} ({:.2})", candidate.value, candidate.confidence);
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Noise**: denylist predicate for CSS, markup, MIME and stop-word tokens
//! - **Structure**: shape signatures such as `CAS-107073` → `A-#`
//! - **Discovery**: resumable, checkpointed frequency scan over a corpus
//! - **Rules**: curated, confidence-weighted regular expressions per category
//! - **Extraction**: per-message matching, scoring and grouping
//!
//! Discovery feeds an offline human verification step which in turn curates
//! the rule library consumed by the extractor.

pub mod config;
pub mod discovery;
pub mod extraction;
pub mod logging;
pub mod noise;
pub mod rules;
pub mod simple;
pub mod structure;
pub mod templates;
pub mod util;

pub use discovery::discover;
pub use extraction::extract;
pub use simple::{Mailmine, MailmineBuilder};

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::simple::{Mailmine, MailmineBuilder};

    pub use crate::{init, init_with_defaults};

    pub use crate::config::{
        ConfigBuilder, DiscoveryConfig, ExtractionConfig, LogLevel, LoggingConfig,
        MailmineConfig, NoiseConfig,
    };

    pub use crate::discovery::{
        CancelFlag, CheckpointStore, CorpusRow, CorpusSource, Discovery, DiscoveryOutcome,
        DiscoveryRecord, DiscoveryReport, DiscoveryState, DiscoveryStatus, Discoverer,
        JsonLinesCorpus, MemoryCorpus,
    };

    pub use crate::extraction::{
        CandidateMatch, ExtractionResult, ExtractorBuilder, MatchSource, PatternExtractor,
        UniversalExtractor,
    };

    pub use crate::noise::NoiseClassifier;
    pub use crate::rules::{EntityCategory, RuleDefinition, RuleLibrary, VerifiedRule};
    pub use crate::structure::structure_of;

    pub use crate::{MailmineError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Mailmine operations
#[derive(Debug, thiserror::Error)]
pub enum MailmineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The discovery record could not be persisted or restored
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] discovery::CheckpointError),

    /// The corpus could not be read at all
    #[error("Corpus error: {0}")]
    Corpus(#[from] discovery::CorpusReadError),

    /// A rule definition could not be loaded
    #[error("Rule error: {0}")]
    Rule(#[from] rules::RuleCompileError),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),

    /// A background scan task failed to complete
    #[error("Discovery task failed: {0}")]
    Task(String),

    /// Other unclassified errors
    #[error("{0}")]
    Other(String),
}

impl From<crate::config::ConfigError> for MailmineError {
    fn from(err: crate::config::ConfigError) -> Self {
        MailmineError::Configuration(err.to_string())
    }
}

/// Result type for Mailmine operations
pub type Result<T> = std::result::Result<T, MailmineError>;

/// Initialize Mailmine with default configuration
///
/// Sets up logging and returns a [`Mailmine`] facade backed by the built-in
/// rule library.
///
/// # Examples
///
/// ```rust
/// use mailmine::prelude::*;
///
/// async fn example() -> Result<()> {
///     let mailmine = init_with_defaults().await?;
///     let result = mailmine.extract("Quote WQ-1234567 attached");
///     assert!(!result.is_empty());
///     Ok(())
/// }
/// ```
pub async fn init_with_defaults() -> Result<Mailmine> {
    let config = config::ConfigBuilder::new().build()?;
    init(config).await
}

/// Initialize Mailmine with the provided configuration
///
/// Logging is initialised first (an already-installed subscriber is left in
/// place), then the rule library and, if configured and present, the
/// discovery checkpoint are loaded.
pub async fn init(config: config::MailmineConfig) -> Result<Mailmine> {
    let _ = logging::init(&config.logging);

    Mailmine::from_config(config).await
}
