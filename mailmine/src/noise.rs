//! Noise classification for candidate tokens.
//!
//! Email bodies are full of things that look like identifiers but are not:
//! CSS declarations from HTML mail, hex colours, MIME headers, markup and
//! plain English words. The classifier is a pure predicate over a token; the
//! denylist itself is configuration data ([`NoiseConfig`]).

use crate::config::NoiseConfig;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"^</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>]*)?/?>$").unwrap();
    static ref CSS_LENGTH: Regex = Regex::new(r"^-?\d+(?:\.\d+)?([A-Za-z]{1,3}|%)$").unwrap();
    static ref HEX_BODY: Regex = Regex::new(r"^[0-9A-Fa-f]{6}$").unwrap();
    static ref CSS_NAME: Regex = Regex::new(r"^-?[a-z]+(?:-[a-z]+)+$").unwrap();
}

/// The text since the last `<`, lowercased, when it is still inside an
/// unclosed tag or a `<style>` element.
fn open_markup(prefix: &str) -> Option<String> {
    let tail = prefix[prefix.rfind('<')?..].to_ascii_lowercase();
    if !tail.contains('>') || tail.starts_with("<style") {
        Some(tail)
    } else {
        None
    }
}

/// Noise that only shows in the text around a token.
///
/// `start..end` is the byte span of the token in `text`. Catches the bare
/// digits of a `#RRGGBB` colour and hyphenated names used as declarations
/// inside a `style` attribute or element.
pub fn markup_noise(text: &str, start: usize, end: usize) -> Option<NoiseReason> {
    let token = &text[start..end];
    let prefix = &text[..start];

    if HEX_BODY.is_match(token)
        && let Some(before_hash) = prefix.strip_suffix('#')
        && !before_hash.chars().next_back().is_some_and(char::is_alphanumeric)
        && (token.bytes().any(|b| b.is_ascii_alphabetic()) || open_markup(prefix).is_some())
    {
        return Some(NoiseReason::HexColor);
    }

    if CSS_NAME.is_match(token)
        && text[end..].trim_start().starts_with(':')
        && let Some(markup) = open_markup(prefix)
        && (markup.contains("style=") || markup.starts_with("<style"))
    {
        return Some(NoiseReason::CssProperty);
    }

    None
}

/// Why a token was classified as noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseReason {
    /// Shorter than the minimum length
    TooShort,
    /// `#RRGGBB` colour code
    HexColor,
    /// Bare HTML tag
    HtmlTag,
    /// CSS property name or vendor-prefixed property
    CssProperty,
    /// Number with a CSS unit suffix
    CssUnit,
    /// MIME header or transfer token
    MimeToken,
    /// Common English word
    StopWord,
    /// Literal denylist entry
    Denylisted,
}

impl NoiseReason {
    /// Get a string representation of the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoiseReason::TooShort => "too_short",
            NoiseReason::HexColor => "hex_color",
            NoiseReason::HtmlTag => "html_tag",
            NoiseReason::CssProperty => "css_property",
            NoiseReason::CssUnit => "css_unit",
            NoiseReason::MimeToken => "mime_token",
            NoiseReason::StopWord => "stop_word",
            NoiseReason::Denylisted => "denylisted",
        }
    }
}

impl fmt::Display for NoiseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a candidate token is markup or boilerplate noise.
#[derive(Debug, Clone)]
pub struct NoiseClassifier {
    min_length: usize,
    css_properties: BTreeSet<String>,
    css_prefixes: Vec<String>,
    css_suffixes: Vec<String>,
    css_units: BTreeSet<String>,
    mime_tokens: BTreeSet<String>,
    stop_words: BTreeSet<String>,
    denylist: BTreeSet<String>,
}

fn lowercase_set(items: &BTreeSet<String>) -> BTreeSet<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

impl NoiseClassifier {
    /// Build a classifier from denylist configuration.
    pub fn new(config: &NoiseConfig) -> Self {
        Self {
            min_length: config.min_length,
            css_properties: lowercase_set(&config.css_properties),
            css_prefixes: config.css_prefixes.iter().map(|p| p.to_lowercase()).collect(),
            css_suffixes: config.css_suffixes.iter().map(|p| p.to_lowercase()).collect(),
            css_units: lowercase_set(&config.css_units),
            mime_tokens: lowercase_set(&config.mime_tokens),
            stop_words: lowercase_set(&config.stop_words),
            denylist: lowercase_set(&config.denylist),
        }
    }

    /// The default minimum token length.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Whether the token is noise, using the configured minimum length.
    pub fn is_noise(&self, token: &str) -> bool {
        self.noise_reason(token).is_some()
    }

    /// Whether the token is noise, using a call-site specific minimum length.
    pub fn is_noise_with_min(&self, token: &str, min_length: usize) -> bool {
        self.noise_reason_with_min(token, min_length).is_some()
    }

    /// The rule that classifies the token as noise, if any.
    pub fn noise_reason(&self, token: &str) -> Option<NoiseReason> {
        self.noise_reason_with_min(token, self.min_length)
    }

    /// The rule that classifies the token as noise under the given length bound.
    ///
    /// Structural checks (hex colours, HTML tags) are case-sensitive regexes;
    /// word-list checks are case-insensitive.
    pub fn noise_reason_with_min(&self, token: &str, min_length: usize) -> Option<NoiseReason> {
        let token = token.trim();
        if token.chars().count() < min_length {
            return Some(NoiseReason::TooShort);
        }
        if HEX_COLOR.is_match(token) {
            return Some(NoiseReason::HexColor);
        }
        if HTML_TAG.is_match(token) {
            return Some(NoiseReason::HtmlTag);
        }

        let lower = token.to_lowercase();
        if self.denylist.contains(&lower) || self.denylist.contains(lower.trim_start_matches('#')) {
            return Some(NoiseReason::Denylisted);
        }
        if self.css_properties.contains(lower.trim_end_matches(':'))
            || self.css_prefixes.iter().any(|p| lower.starts_with(p.as_str()))
            || (CSS_NAME.is_match(token) && self.css_suffixes.iter().any(|s| lower.ends_with(s.as_str())))
        {
            return Some(NoiseReason::CssProperty);
        }
        if let Some(caps) = CSS_LENGTH.captures(&lower)
            && self.css_units.contains(&caps[1])
        {
            return Some(NoiseReason::CssUnit);
        }
        if self.mime_tokens.contains(&lower) || lower.starts_with("=_nextpart") {
            return Some(NoiseReason::MimeToken);
        }
        if self.stop_words.contains(&lower) {
            return Some(NoiseReason::StopWord);
        }

        None
    }

    /// Classify the token at byte span `start..end` of `text`, taking the
    /// surrounding markup into account.
    pub fn noise_reason_at(&self, text: &str, start: usize, end: usize, min_length: usize) -> Option<NoiseReason> {
        self.noise_reason_with_min(&text[start..end], min_length)
            .or_else(|| markup_noise(text, start, end))
    }

    /// Whether the token at byte span `start..end` of `text` is noise.
    pub fn is_noise_at(&self, text: &str, start: usize, end: usize, min_length: usize) -> bool {
        self.noise_reason_at(text, start, end, min_length).is_some()
    }
}

impl Default for NoiseClassifier {
    fn default() -> Self {
        Self::new(&NoiseConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors_are_noise() {
        let classifier = NoiseClassifier::default();
        assert_eq!(classifier.noise_reason("#a1b2c3"), Some(NoiseReason::HexColor));
        assert_eq!(classifier.noise_reason("#FFAA00"), Some(NoiseReason::HexColor));
        // Seven hex digits is not a colour
        assert_eq!(classifier.noise_reason("#a1b2c3d"), None);
    }

    #[test]
    fn test_css_tokens_are_noise() {
        let classifier = NoiseClassifier::default();
        assert_eq!(classifier.noise_reason("margin-top"), Some(NoiseReason::CssProperty));
        assert_eq!(classifier.noise_reason("MARGIN-TOP"), Some(NoiseReason::CssProperty));
        assert_eq!(classifier.noise_reason("mso-line-height-rule"), Some(NoiseReason::CssProperty));
        assert_eq!(classifier.noise_reason("12px"), Some(NoiseReason::CssUnit));
        assert_eq!(classifier.noise_reason("1.5em"), Some(NoiseReason::CssUnit));
        // A number with a non-unit suffix stays a candidate
        assert_eq!(classifier.noise_reason("4500ABC"), None);
    }

    #[test]
    fn test_color_suffix_properties_are_noise() {
        let classifier = NoiseClassifier::default();
        assert_eq!(classifier.noise_reason("border-color"), Some(NoiseReason::CssProperty));
        assert_eq!(classifier.noise_reason("outline-color"), Some(NoiseReason::CssProperty));
        assert_eq!(classifier.noise_reason("border-top-width"), Some(NoiseReason::CssProperty));
        // Upper-case identifiers keep their shape
        assert_eq!(classifier.noise_reason("XHU-COLOR"), None);
    }

    fn span(text: &str, token: &str) -> (usize, usize) {
        let start = text.find(token).unwrap();
        (start, start + token.len())
    }

    #[test]
    fn test_hex_body_after_hash_is_noise() {
        let text = r#"<td style="background-color:#C0C0C0">Quote</td> and #A1B2C3 later"#;
        let (s, e) = span(text, "C0C0C0");
        assert_eq!(markup_noise(text, s, e), Some(NoiseReason::HexColor));
        let (s, e) = span(text, "A1B2C3");
        assert_eq!(markup_noise(text, s, e), Some(NoiseReason::HexColor));

        // An order number glued to a label is not a colour
        let text = "See PO#450012 and ref 4A12B3";
        let (s, e) = span(text, "450012");
        assert_eq!(markup_noise(text, s, e), None);
        let (s, e) = span(text, "4A12B3");
        assert_eq!(markup_noise(text, s, e), None);
    }

    #[test]
    fn test_declarations_in_style_context_are_noise() {
        let classifier = NoiseClassifier::default();
        let text = r#"<p style="scrollbar-gutter: auto">follow-up: call back</p><style>.x { caret-shape:bar }</style>"#;

        let (s, e) = span(text, "scrollbar-gutter");
        assert_eq!(classifier.noise_reason_at(text, s, e, 2), Some(NoiseReason::CssProperty));
        let (s, e) = span(text, "caret-shape");
        assert!(classifier.is_noise_at(text, s, e, 2));
        // Same shape in body text is left alone
        let (s, e) = span(text, "follow-up");
        assert!(!classifier.is_noise_at(text, s, e, 2));
    }

    #[test]
    fn test_markup_and_mime_are_noise() {
        let classifier = NoiseClassifier::default();
        assert_eq!(classifier.noise_reason("<br>"), Some(NoiseReason::HtmlTag));
        assert_eq!(classifier.noise_reason("</td>"), Some(NoiseReason::HtmlTag));
        assert_eq!(classifier.noise_reason("Content-Type"), Some(NoiseReason::MimeToken));
        assert_eq!(classifier.noise_reason("quoted-printable"), Some(NoiseReason::MimeToken));
    }

    #[test]
    fn test_stop_words_and_denylist_are_case_insensitive() {
        let classifier = NoiseClassifier::default();
        assert_eq!(classifier.noise_reason("The"), Some(NoiseReason::StopWord));
        assert_eq!(classifier.noise_reason("PLEASE"), Some(NoiseReason::StopWord));
        assert_eq!(classifier.noise_reason("0563c1"), Some(NoiseReason::Denylisted));
        assert_eq!(classifier.noise_reason("0563C1"), Some(NoiseReason::Denylisted));
    }

    #[test]
    fn test_length_threshold_is_a_parameter() {
        let classifier = NoiseClassifier::default();
        assert_eq!(classifier.min_length(), 2);
        assert!(classifier.is_noise("X"));
        assert!(!classifier.is_noise("Q7"));
        assert!(classifier.is_noise_with_min("Q7", 3));
        assert!(!classifier.is_noise_with_min("Q77", 3));
    }

    #[test]
    fn test_identifiers_are_not_noise() {
        let classifier = NoiseClassifier::default();
        for token in ["CAS-107073-B4P8K8", "TS-1818562", "0505915850", "WQ-1234567", "PO#4500123"] {
            assert!(!classifier.is_noise(token), "{} should not be noise", token);
        }
    }

    #[test]
    fn test_custom_denylist_data() {
        let mut config = NoiseConfig::default();
        config.denylist.insert("ACME-0000".to_string());
        config.stop_words.clear();
        let classifier = NoiseClassifier::new(&config);
        assert!(classifier.is_noise("acme-0000"));
        assert!(!classifier.is_noise("the"));
    }
}
