//! Relevance weighting and top-K selection over a retrieved candidate pool.
//!
//! Each candidate's weight is the sum of three terms:
//!
//! 1. a name-match term (whole-word containment of the query beats substring
//!    containment beats none),
//! 2. an alternate-name term rewarding breadth of matching alternates and
//!    penalizing their average edit distance as a fractional adjustment,
//! 3. a rank-decay term preserving the retrieval-stage ordering as a
//!    tie-breaker.
//!
//! Selection pops the top `count` from a max-heap keyed by weight.

use std::{cmp::Ordering, collections::BinaryHeap};

use rapidfuzz::distance::levenshtein;

use super::Candidate;

/// Weight multipliers used for result relevance.
///
/// Exact whole-word name containment.
pub const WEIGHT_NAME_MATCH: f64 = 20_000.0;
/// Substring-but-not-whole-word name containment.
pub const WEIGHT_NAME_PART_MATCH: f64 = 15_000.0;
/// Per alternate name examined; breadth of alternate names is evidence of
/// relevance.
pub const WEIGHT_ALT_NAME: f64 = 50.0;
/// Per position of retrieval order preserved into the final weight.
pub const WEIGHT_SORT_ORDER: f64 = 20.0;

/// Weight contribution of the alternate-name evidence.
///
/// `alt_name_count * WEIGHT_ALT_NAME` rewards records with more alternate
/// names; subtracting the *average* accumulated edit distance
/// (`edit_distance / alt_name_count`) penalizes looser matches without ever
/// letting the penalty dominate the breadth term.
#[must_use]
pub fn calibrated_alt_name_weight(alt_name_count: usize, accumulated_edit_distance: f64) -> f64 {
    let n = alt_name_count as f64;
    n * WEIGHT_ALT_NAME - accumulated_edit_distance / n
}

/// Weight the candidates for `query_name` and return the `count` best,
/// highest weight first.
///
/// Every weight is written before its candidate enters the selection heap.
/// Equal weights are broken toward the earlier retrieval position, keeping
/// selection deterministic; `BinaryHeap` alone promises nothing for equal
/// keys, so the position is part of the heap key.
pub(crate) fn rank(query_name: &str, mut candidates: Vec<Candidate>, count: usize) -> Vec<Candidate> {
    if candidates.is_empty() || count == 0 {
        return Vec::new();
    }

    let total = candidates.len();
    let padded_query = format!(" {query_name} ");
    for (position, candidate) in candidates.iter_mut().enumerate() {
        // Pad both strings with spaces so whole-word containment cannot
        // match inside an unrelated longer word.
        let padded_name = format!(" {} ", candidate.name);
        let mut weight = if padded_name.contains(&padded_query) {
            WEIGHT_NAME_MATCH
        } else if padded_name.contains(query_name) {
            WEIGHT_NAME_PART_MATCH
        } else {
            0.0
        };

        let mut edit_distance = 0.0;
        for alternate in &candidate.alternate_names {
            if alternate.contains(query_name) {
                edit_distance +=
                    levenshtein::distance(query_name.chars(), alternate.chars()) as f64;
            }
        }
        weight += calibrated_alt_name_weight(candidate.alternate_names.len(), edit_distance);

        // Earlier retrieval positions carry more residual weight, so the
        // candidate the composite sort already favored wins absent any
        // textual signal.
        weight += (total - position) as f64 * WEIGHT_SORT_ORDER;

        candidate.weight = weight;
    }

    let mut heap: BinaryHeap<RankedCandidate> = candidates
        .into_iter()
        .enumerate()
        .map(|(position, candidate)| RankedCandidate {
            position,
            candidate,
        })
        .collect();

    let mut selected = Vec::with_capacity(count.min(total));
    while selected.len() < count {
        match heap.pop() {
            Some(entry) => selected.push(entry.candidate),
            None => break,
        }
    }
    selected
}

/// Max-heap entry: greater weight wins; on equal weight the smaller
/// retrieval position wins.
struct RankedCandidate {
    position: usize,
    candidate: Candidate,
}

impl PartialEq for RankedCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedCandidate {}

impl PartialOrd for RankedCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.candidate
            .weight
            .total_cmp(&other.candidate.weight)
            .then_with(|| other.position.cmp(&self.position))
    }
}
