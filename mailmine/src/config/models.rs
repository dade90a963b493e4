//! Configuration model definitions.
//!
//! This module contains the configuration structures for all Mailmine components.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Rows pulled from the corpus per discovery batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;
/// Batches between two discovery checkpoints.
pub const DEFAULT_CHECKPOINT_EVERY: usize = 1;
/// Minimum occurrences for a literal to appear in a discovery report.
pub const DEFAULT_MIN_FREQUENCY: u64 = 50;
/// Minimum distinct literals before a shape is reported as structural.
pub const DEFAULT_MIN_DISTINCT_PER_STRUCTURE: usize = 3;
/// Characters either side of a match scanned for classification hints.
pub const DEFAULT_HINT_RADIUS: usize = 50;
/// Tokens shorter than this are always noise.
pub const DEFAULT_NOISE_MIN_LENGTH: usize = 2;
/// Stricter noise length bound applied to generic structural matches.
pub const DEFAULT_STRUCTURAL_MIN_LENGTH: usize = 3;
/// Confidence added when a rule's context keyword is found near a match.
pub const DEFAULT_KEYWORD_BOOST: f32 = 0.1;
/// Matches at or above this confidence are reported as high confidence.
pub const DEFAULT_HIGH_CONFIDENCE: f32 = 0.8;
/// Confidence of a structural match with no discovery evidence.
pub const DEFAULT_STRUCTURAL_BASE_CONFIDENCE: f32 = 0.5;
/// Text beyond this many bytes is not passed to any regex.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;
/// Relative frequency threshold (fraction of processed rows); 0 disables it.
pub const DEFAULT_MIN_ROW_FRACTION: f64 = 0.0;

/// Main configuration structure for Mailmine.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MailmineConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Noise denylist configuration
    pub noise: NoiseConfig,

    /// Corpus discovery configuration
    pub discovery: DiscoveryConfig,

    /// Per-message extraction configuration
    pub extraction: ExtractionConfig,

    /// Verified rule source configuration
    pub rules: RulesConfig,
}

/// Denylist data used by the noise classifier.
///
/// Everything here is data: entries can be added or removed from a config
/// file without touching code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Tokens shorter than this (in characters) are noise
    pub min_length: usize,

    /// CSS property names, matched case-insensitively
    pub css_properties: BTreeSet<String>,

    /// Prefixes of vendor or Office style properties (e.g. `mso-`)
    pub css_prefixes: Vec<String>,

    /// Suffixes of hyphenated CSS property names (e.g. `-color`)
    pub css_suffixes: Vec<String>,

    /// Unit suffixes that turn a number into a CSS length (e.g. `px`)
    pub css_units: BTreeSet<String>,

    /// MIME header names and transfer tokens, matched case-insensitively
    pub mime_tokens: BTreeSet<String>,

    /// Common English words, matched case-insensitively
    pub stop_words: BTreeSet<String>,

    /// Literal tokens that are known noise (matched case-insensitively)
    pub denylist: BTreeSet<String>,
}

fn string_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_NOISE_MIN_LENGTH,
            css_properties: string_set(&[
                "margin", "margin-top", "margin-bottom", "margin-left", "margin-right",
                "padding", "padding-top", "padding-bottom", "padding-left", "padding-right",
                "font", "font-size", "font-family", "font-weight", "font-style",
                "line-height", "text-align", "text-decoration", "text-indent",
                "vertical-align", "color", "background", "background-color",
                "border", "border-top", "border-bottom", "border-left", "border-right",
                "border-collapse", "border-spacing", "width", "height", "min-width",
                "max-width", "display", "position", "float", "clear", "overflow",
                "white-space", "word-wrap", "list-style", "z-index", "page-break-before",
                "page-break-after", "letter-spacing", "table-layout", "cellpadding",
                "cellspacing", "valign", "bgcolor",
            ]),
            css_prefixes: vec![
                "mso-".to_string(),
                "-webkit-".to_string(),
                "-moz-".to_string(),
                "-ms-".to_string(),
            ],
            css_suffixes: vec!["-color".to_string(), "-width".to_string(), "-style".to_string()],
            css_units: string_set(&["px", "pt", "em", "rem", "ex", "cm", "mm", "in", "pc", "%", "vh", "vw"]),
            mime_tokens: string_set(&[
                "content-type", "content-transfer-encoding", "content-disposition",
                "content-id", "mime-version", "text/html", "text/plain",
                "multipart/alternative", "multipart/mixed", "multipart/related",
                "application/octet-stream", "quoted-printable", "base64", "7bit", "8bit",
                "charset", "utf-8", "us-ascii", "iso-8859-1", "windows-1252", "boundary",
                "x-mailer", "x-ms-exchange", "message-id", "nextpart",
            ]),
            stop_words: string_set(&[
                "the", "and", "for", "are", "but", "not", "you", "all", "any", "can",
                "had", "her", "was", "one", "our", "out", "day", "get", "has", "him",
                "his", "how", "its", "may", "new", "now", "old", "see", "two", "who",
                "did", "let", "put", "say", "she", "too", "use", "with", "this", "that",
                "from", "have", "will", "your", "they", "been", "were", "when", "what",
                "which", "there", "their", "would", "about", "please", "thanks",
                "thank", "regards", "best", "hello", "dear", "hi", "re", "fw", "fwd",
                "of", "to", "in", "on", "at", "by", "is", "it", "be", "as", "or", "an",
                "if", "we", "so", "do", "no", "up", "my", "me",
            ]),
            denylist: string_set(&["0563C1", "954F72", "1F497D", "1F4E79", "000000", "FFFFFF"]),
        }
    }
}

/// Configuration for the statistical pattern discoverer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Rows pulled from the corpus per batch
    pub batch_size: usize,

    /// Number of batches between checkpoints
    pub checkpoint_every: usize,

    /// Where the discovery record is persisted (None disables checkpointing)
    pub checkpoint_path: Option<PathBuf>,

    /// Minimum occurrences for a literal to be reported
    pub min_frequency: u64,

    /// Relative threshold as a fraction of processed rows (0 disables)
    pub min_row_fraction: f64,

    /// Minimum distinct literals for a structural signature to be reported
    pub min_distinct_per_structure: usize,

    /// Characters either side of a match scanned for classification hints
    pub hint_radius: usize,

    /// Number of sample values kept per reported structure
    pub structure_samples: usize,

    /// Retry policy for checkpoint writes
    pub retry: RetryConfig,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            checkpoint_every: DEFAULT_CHECKPOINT_EVERY,
            checkpoint_path: None,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            min_row_fraction: DEFAULT_MIN_ROW_FRACTION,
            min_distinct_per_structure: DEFAULT_MIN_DISTINCT_PER_STRUCTURE,
            hint_radius: DEFAULT_HINT_RADIUS,
            structure_samples: 5,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy for durable writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts before giving up (including the first)
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds
    pub initial_backoff_ms: u64,

    /// Multiplier for exponential backoff
    pub backoff_multiplier: f32,

    /// Maximum backoff duration in milliseconds
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_ms: 100,
            backoff_multiplier: 2.0,
            max_backoff_ms: 5000,
        }
    }
}

/// One step of the occurrence-count → confidence policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceTier {
    /// Applies when the corpus count is strictly greater than this
    pub min_count: u64,

    /// Confidence assigned for this tier
    pub confidence: f32,
}

/// Configuration for the universal pattern extractor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Characters either side of a match kept as context
    pub context_radius: usize,

    /// Confidence added when a context keyword is present
    pub keyword_boost: f32,

    /// Threshold for the high confidence subset
    pub high_confidence_threshold: f32,

    /// Confidence of a structural match with no discovery evidence
    pub structural_base_confidence: f32,

    /// Noise length bound for generic structural matches
    pub structural_min_length: usize,

    /// Count tiers, highest count first
    pub confidence_tiers: Vec<ConfidenceTier>,

    /// Whether generic structural templates run at all
    pub include_structural: bool,

    /// Input is truncated to this many bytes before matching
    pub max_input_bytes: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            context_radius: DEFAULT_HINT_RADIUS,
            keyword_boost: DEFAULT_KEYWORD_BOOST,
            high_confidence_threshold: DEFAULT_HIGH_CONFIDENCE,
            structural_base_confidence: DEFAULT_STRUCTURAL_BASE_CONFIDENCE,
            structural_min_length: DEFAULT_STRUCTURAL_MIN_LENGTH,
            confidence_tiers: vec![
                ConfidenceTier { min_count: 10_000, confidence: 0.95 },
                ConfidenceTier { min_count: 1_000, confidence: 0.85 },
                ConfidenceTier { min_count: 100, confidence: 0.7 },
                ConfidenceTier { min_count: 10, confidence: 0.6 },
            ],
            include_structural: true,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Where the verified rule library comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// JSON rule file; the built-in library is used when unset
    pub file: Option<PathBuf>,

    /// Whether built-in rules are kept when a file is also given
    pub merge_builtin: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,

    /// Log format
    pub format: LogFormat,

    /// File to log to (if any)
    pub file: Option<PathBuf>,

    /// Whether to log to stdout
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Default,
            file: None,
            stdout: true,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level
    Trace,

    /// Debug level
    Debug,

    /// Info level
    Info,

    /// Warn level
    Warn,

    /// Error level
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default format
    Default,

    /// JSON format
    Json,

    /// Compact format
    Compact,

    /// Pretty format
    Pretty,
}
