use crate::util::words;
use std::collections::BTreeSet;

/// Keyword → category label table used to annotate discovered values.
///
/// Keywords are matched against whole words of the context window. Keywords
/// of four or more characters also match when followed by a common
/// inflection, so `track` covers `tracking` and `ship` covers `shipment`
/// while `bill` does not fire on `billion`.
pub const HINT_KEYWORDS: &[(&str, &str)] = &[
    ("quote", "quote"),
    ("quotation", "quote"),
    ("po", "purchase_order"),
    ("purchase", "purchase_order"),
    ("order", "purchase_order"),
    ("spa", "spa"),
    ("agreement", "spa"),
    ("ticket", "ticket"),
    ("case", "ticket"),
    ("support", "ticket"),
    ("deal", "deal"),
    ("registration", "deal"),
    ("ref", "reference"),
    ("reference", "reference"),
    ("track", "tracking"),
    ("ship", "tracking"),
    ("invoice", "invoice"),
    ("bill", "invoice"),
];

const PREFIX_MIN_LEN: usize = 4;

const INFLECTIONS: &[&str] = &[
    "s", "es", "d", "ed", "ing", "ings", "er", "ers", "ment", "ments", "ped", "ping", "per", "pers",
];

fn keyword_matches(word: &str, keyword: &str) -> bool {
    if word == keyword {
        return true;
    }
    keyword.len() >= PREFIX_MIN_LEN
        && word
            .strip_prefix(keyword)
            .is_some_and(|rest| INFLECTIONS.contains(&rest))
}

/// Category labels whose keywords occur in the window, each at most once.
pub fn hint_labels(window: &str) -> BTreeSet<&'static str> {
    let mut labels = BTreeSet::new();
    for word in words(window) {
        for (keyword, label) in HINT_KEYWORDS {
            if keyword_matches(&word, keyword) {
                labels.insert(*label);
            }
        }
    }
    labels
}
