//! Generic structural templates.
//!
//! These are deliberately domain-agnostic: they describe what identifiers
//! tend to look like (letter prefixes, long numbers, dashed chains, hashes)
//! rather than what any particular business calls them. The discoverer
//! counts their matches across a corpus; the extractor reuses the same set
//! read-only so that discovery counts line up with extraction candidates.

use lazy_static::lazy_static;
use regex::Regex;

/// One generic template.
#[derive(Debug)]
pub struct Template {
    /// Stable identifier, used as the discovery `pattern_type` key
    pub id: &'static str,
    /// Short human description
    pub description: &'static str,
    /// Compiled expression
    pub regex: Regex,
}

/// The full, ordered set of generic templates.
#[derive(Debug)]
pub struct TemplateSet {
    templates: Vec<Template>,
}

const DEFINITIONS: &[(&str, &str, &str)] = &[
    ("upper_dash_number", "Letter prefix, dash, number (CAS-107073)", r"\b[A-Z]{2,6}-\d{3,}\b"),
    (
        "upper_dash_chain",
        "Dash-separated uppercase/digit chain (CAS-107073-B4P8K8)",
        r"\b[A-Z0-9]{2,}(?:-[A-Z0-9]{2,}){2,}\b",
    ),
    ("upper_number", "Letter prefix glued to a number (INC123456)", r"\b[A-Z]{1,5}\d{4,}\b"),
    ("number_upper", "Number with a letter suffix (123456AB)", r"\b\d{3,}[A-Z]{1,5}\b"),
    ("long_number", "Bare number of six or more digits", r"\b\d{6,}\b"),
    ("leading_zero_number", "Zero-padded number", r"\b0\d{5,}\b"),
    (
        "prefixed_number",
        "Short word, separator, number (PO#123, Ref: 4567)",
        r"\b[A-Za-z]{2,4}\s?[#:]\s?\d{3,}\b",
    ),
    ("underscore_pattern", "Underscore-joined tokens", r"\b[A-Za-z0-9]+(?:_[A-Za-z0-9]+)+\b"),
    ("parenthetical_number", "Number in parentheses", r"\(\d{3,}\)"),
    ("hash_like", "Long hexadecimal token", r"\b[0-9a-fA-F]{16,}\b"),
    ("date_iso", "ISO date", r"\b\d{4}-\d{2}-\d{2}\b"),
    ("date_slash", "Slash date", r"\b\d{1,2}/\d{1,2}/\d{2,4}\b"),
    ("slash_code", "Slash-separated code", r"\b[A-Z0-9]{2,}(?:/[A-Z0-9]{2,})+\b"),
    ("dotted_code", "Dot-separated code", r"\b[A-Z0-9]{2,}(?:\.[A-Z0-9]{2,})+\b"),
    ("mixed_alnum", "Interleaved letters and digits (B4P8K8)", r"\b[A-Z]+\d+[A-Z]+[A-Z0-9]*\b"),
    ("lower_dash_number", "Lowercase prefix, dash, number", r"\b[a-z]{2,}-\d{3,}\b"),
    ("hash_prefixed", "Hash followed by a number (#12345)", r"#\d{3,}\b"),
    (
        "email_address",
        "Email address",
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
    ),
    ("lower_hyphen_word", "Hyphenated lowercase words", r"\b[a-z]{2,}(?:-[a-z]{2,})+\b"),
];

lazy_static! {
    static ref GENERIC: TemplateSet = TemplateSet {
        templates: DEFINITIONS
            .iter()
            .map(|(id, description, pattern)| Template {
                id,
                description,
                regex: Regex::new(pattern).unwrap(),
            })
            .collect(),
    };
}

impl TemplateSet {
    /// The shared generic template set.
    pub fn generic() -> &'static TemplateSet {
        &GENERIC
    }

    /// Iterate templates in their stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Look up a template by id.
    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Template ids in their stable order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.templates.iter().map(|t| t.id).collect()
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
