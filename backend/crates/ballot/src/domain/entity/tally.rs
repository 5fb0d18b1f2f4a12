//! Per-candidate vote count

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateTally {
    pub candidate: String,
    pub votes: u64,
}

/// Descending by count, ties by candidate name
pub fn sort_tally(tally: &mut [CandidateTally]) {
    tally.sort_by(|a, b| {
        b.votes
            .cmp(&a.votes)
            .then_with(|| a.candidate.cmp(&b.candidate))
    });
}
