//! Divergence between two vote-count submissions.

use crate::TrustError;
use recount_store::SubmissionRow;
use std::collections::BTreeMap;

/// Total absolute vote difference between two submissions for the same unit.
///
/// Returns [`TrustError::Incomparable`] when the submissions belong to
/// different units or report different option sets — that case carries no
/// information about honesty and must not score as a zero difference.
///
/// Blank cells (partial submissions) count as zero votes.
pub fn vote_divergence(a: &SubmissionRow, b: &SubmissionRow) -> Result<u64, TrustError> {
    if a.unit != b.unit {
        return Err(TrustError::Incomparable(format!(
            "{} is for {} but {} is for {}",
            a.id, a.unit, b.id, b.unit
        )));
    }

    let votes_a: BTreeMap<_, _> = a
        .reported
        .entries()
        .iter()
        .map(|e| (e.option, e.votes.unwrap_or(0) as i64))
        .collect();
    let votes_b: BTreeMap<_, _> = b
        .reported
        .entries()
        .iter()
        .map(|e| (e.option, e.votes.unwrap_or(0) as i64))
        .collect();

    if votes_a.keys().ne(votes_b.keys()) {
        return Err(TrustError::Incomparable(format!(
            "{} and {} report different option sets",
            a.id, b.id
        )));
    }

    let diff = votes_a
        .iter()
        .map(|(option, va)| (va - votes_b[option]).unsigned_abs())
        .sum();
    Ok(diff)
}
