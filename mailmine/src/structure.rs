//! Structural generalization of identifier strings.
//!
//! A structural signature abstracts a concrete string to its shape so that
//! syntactically similar identifiers group together regardless of value:
//!
//! | input               | signature    |
//! |---------------------|--------------|
//! | `CAS-107073`        | `A-#`        |
//! | `CAS-107073-B4P8K8` | `A-#-A#A#A#` |
//! | `ref_no_42`         | `@_@_#`      |
//! | `Q2-2024`           | `A#-#`       |
//!
//! Runs of ASCII digits become `#`, runs of lowercase ASCII letters `@`, runs
//! of uppercase ASCII letters `A`. Every other character is kept in place.
//!
//! The placeholder glyphs are also ordinary characters, so a literal `#` or
//! `@` next to a run of the same class merges with it: `PO#123` and `PO123`
//! both map to `A#`, and `sales@acme` maps to `@`. The collapse step makes the
//! function a fixed point on its own output.

/// Placeholder for a run of ASCII digits.
pub const DIGIT: char = '#';
/// Placeholder for a run of lowercase ASCII letters.
pub const LOWER: char = '@';
/// Placeholder for a run of uppercase ASCII letters.
pub const UPPER: char = 'A';

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Digit,
    Lower,
    Upper,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_ascii_digit() {
        CharClass::Digit
    } else if c.is_ascii_lowercase() {
        CharClass::Lower
    } else if c.is_ascii_uppercase() {
        CharClass::Upper
    } else {
        CharClass::Other
    }
}

fn is_placeholder(c: char) -> bool {
    matches!(c, DIGIT | LOWER | UPPER)
}

/// Map a concrete string to its structural signature.
pub fn structure_of(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut previous_class = CharClass::Other;

    for c in token.chars() {
        let class = classify(c);
        let symbol = match class {
            CharClass::Digit => DIGIT,
            CharClass::Lower => LOWER,
            CharClass::Upper => UPPER,
            CharClass::Other => c,
        };

        // Same class as the previous character: still inside the run.
        if class != CharClass::Other && class == previous_class {
            continue;
        }
        previous_class = class;

        // Collapse repeated placeholder glyphs (`##`, `@@`, `AA`).
        if is_placeholder(symbol) && out.ends_with(symbol) {
            continue;
        }
        out.push(symbol);
    }

    out
}

/// Whether the string is already a fully collapsed signature.
pub fn is_signature(candidate: &str) -> bool {
    structure_of(candidate) == candidate
}

/// Number of placeholder segments in a signature (a rough complexity measure).
pub fn segment_count(signature: &str) -> usize {
    signature.chars().filter(|c| is_placeholder(*c)).count()
}
