//! Human-readable rule summaries for downstream prompt construction.

use super::library::RuleLibrary;
use std::fmt::Write;

impl RuleLibrary {
    /// Render each category's `top_n` rules (by confidence) with their
    /// examples and context keywords.
    pub fn prompt_summary(&self, top_n: usize) -> String {
        let mut out = String::from("Known identifier formats by category:\n");

        for category in self.categories() {
            let rules = self.lookup(category);
            let _ = writeln!(out, "\n{} ({}):", category.display_name(), category.as_str());

            for rule in rules.iter().take(top_n) {
                let _ = write!(
                    out,
                    "- {} [confidence {:.2}]: /{}/",
                    rule.label,
                    rule.base_confidence,
                    rule.pattern()
                );
                if !rule.examples.is_empty() {
                    let _ = write!(out, " e.g. {}", rule.examples.join(", "));
                }
                out.push('\n');
            }

            if rules.len() > top_n {
                let _ = writeln!(out, "  ({} more)", rules.len() - top_n);
            }
            if let Some(first) = rules.first()
                && !first.context_keywords.is_empty()
            {
                let _ = writeln!(out, "  Context keywords: {}", first.context_keywords.join(", "));
            }
        }

        out
    }
}
