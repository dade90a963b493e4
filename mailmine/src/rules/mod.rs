//! Verified rule library.
//!
//! Rules are curated, confidence-weighted regular expressions, each aimed at
//! one business entity category. They are data: loaded once from the
//! built-in table or a JSON file, never mutated during extraction. A rule
//! that fails to compile is set aside in [`RuleLibrary::rejected`] instead of
//! failing the whole library.

mod builtin;
mod library;
mod prompt;
mod types;

pub use builtin::builtin_definitions;
pub use library::{RULE_DFA_SIZE_LIMIT, RULE_SIZE_LIMIT, RuleDefinitions, RuleLibrary};
pub use types::{EntityCategory, RuleDefinition, VerifiedRule};

/// A rule definition that could not be turned into a usable rule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleCompileError {
    /// The expression does not compile, or compiles beyond the size limits
    #[error("rule {category}/{label} has an invalid regex: {reason}")]
    InvalidRegex {
        category: String,
        label: String,
        reason: String,
    },

    /// Base confidence outside `[0, 1]`
    #[error("rule {category}/{label} has confidence {value} outside [0, 1]")]
    InvalidConfidence {
        category: String,
        label: String,
        value: f32,
    },

    /// The definition document itself is unusable
    #[error("invalid rule definitions: {0}")]
    Definition(String),
}
