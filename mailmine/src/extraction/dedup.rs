use super::{CandidateMatch, MatchSource};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Whether `a` should be kept over `b` for the same value and position.
fn outranks(a: &CandidateMatch, b: &CandidateMatch) -> bool {
    match a.confidence.total_cmp(&b.confidence) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => a.source == MatchSource::Rule && b.source == MatchSource::Template,
    }
}

/// Collapse candidates sharing `(value, position)` and sort by position.
///
/// The highest-confidence candidate wins, rules beating templates on ties
/// and earlier candidates beating later ones otherwise. The losers' source
/// ids are recorded on the winner as `alternates`.
pub fn merge_candidates(candidates: Vec<CandidateMatch>) -> Vec<CandidateMatch> {
    let mut slots: HashMap<(usize, String), usize> = HashMap::new();
    let mut kept: Vec<CandidateMatch> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = (candidate.position, candidate.value.clone());
        match slots.get(&key).copied() {
            None => {
                slots.insert(key, kept.len());
                kept.push(candidate);
            }
            Some(slot) => {
                let current = &mut kept[slot];
                if outranks(&candidate, current) {
                    let mut alternates = std::mem::take(&mut current.alternates);
                    alternates.push(current.source_regex_id.clone());
                    *current = candidate;
                    current.alternates = alternates;
                } else {
                    current.alternates.push(candidate.source_regex_id);
                }
            }
        }
    }

    for candidate in &mut kept {
        candidate.alternates.sort();
        candidate.alternates.dedup();
        let winner = candidate.source_regex_id.clone();
        candidate.alternates.retain(|id| *id != winner);
    }

    kept.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| b.end.cmp(&a.end))
            .then_with(|| a.source_regex_id.cmp(&b.source_regex_id))
    });
    kept
}
