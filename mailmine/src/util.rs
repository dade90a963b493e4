//! Text helpers shared by discovery and extraction.
//!
//! Regex matches report byte offsets; everything user-facing in Mailmine
//! speaks in characters, so the conversion lives here.

/// Byte offset → character offset lookup for one piece of text.
#[derive(Debug, Clone)]
pub struct CharIndex<'a> {
    text: &'a str,
    /// Byte offset at which each character starts
    starts: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    /// Index the given text.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            starts: text.char_indices().map(|(i, _)| i).collect(),
        }
    }

    /// Number of characters in the text.
    pub fn char_len(&self) -> usize {
        self.starts.len()
    }

    /// Character offset of the given byte offset.
    ///
    /// Byte offsets inside a multi-byte character resolve to that character;
    /// offsets at or past the end resolve to `char_len()`.
    pub fn char_offset(&self, byte: usize) -> usize {
        if byte >= self.text.len() {
            return self.char_len();
        }
        match self.starts.binary_search(&byte) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Byte offset at which the given character starts.
    pub fn byte_offset(&self, char_pos: usize) -> usize {
        self.starts.get(char_pos).copied().unwrap_or(self.text.len())
    }

    /// Text of `radius` characters either side of the byte span.
    pub fn window(&self, start_byte: usize, end_byte: usize, radius: usize) -> &'a str {
        let start_char = self.char_offset(start_byte).saturating_sub(radius);
        let end_char = (self.char_offset(end_byte) + radius).min(self.char_len());
        &self.text[self.byte_offset(start_char)..self.byte_offset(end_char)]
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `needle` occurs in `haystack` as a whole word, ignoring case.
///
/// Word edges are any non-alphanumeric character, so `po` matches `"PO 123"`
/// and `"(po)"` but not `"report"`. Multi-word needles are matched verbatim.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();

    let mut from = 0;
    while let Some(found) = haystack[from..].find(&needle) {
        let start = from + found;
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Lowercased alphanumeric words of a piece of text.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Cut `text` to at most `max_bytes` without splitting a character.
pub fn truncate_on_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
