//! Deterministic ordering and selection of URL candidates

use crate::cover::types::UrlCandidate;
use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;

/// Sort key: larger is better on every field
fn rank_key(c: &UrlCandidate) -> (u8, u8, u8, u32, i32, Reverse<usize>) {
    (
        c.epic_type_rank,
        c.cover_key_hit,
        c.has_image_extension,
        c.prefer_score,
        c.deprioritize_score,
        Reverse(c.url.len()),
    )
}

/// Best-first comparison; equal rank keys fall back to the URL text so the
/// order never depends on input order
pub fn compare(a: &UrlCandidate, b: &UrlCandidate) -> Ordering {
    rank_key(b)
        .cmp(&rank_key(a))
        .then_with(|| a.url.cmp(&b.url))
}

/// Sorted best-first, one entry per URL
pub fn rank_candidates(mut candidates: Vec<UrlCandidate>) -> Vec<UrlCandidate> {
    candidates.sort_by(compare);
    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.url.clone()));
    candidates
}

/// The winning URL, if any
pub fn select_best(candidates: Vec<UrlCandidate>) -> Option<String> {
    rank_candidates(candidates).into_iter().next().map(|c| c.url)
}
