//! The per-tier voting rule.

use crate::TallyOutcome;
use recount_store::SubmissionRow;
use recount_types::Signature;
use std::collections::HashMap;

/// Run the voting rule over one tier of submissions.
///
/// Callers must have recomputed every row's signature first. The rule:
///
/// 1. The largest signature group with at least `min_matching` members wins
///    outright (confirmed by duplication).
/// 2. Otherwise, with divergent signatures, a CSV-sourced submission wins
///    (party head offices submit digitized official counts in bulk; they
///    outrank interactive submissions).
/// 3. A single signature is unconfirmed unless CSV-backed.
///
/// Witness selection is deterministic: the earliest row (lowest id) of the
/// winning group, or the earliest CSV row.
pub fn tally_votes(submissions: &[SubmissionRow], min_matching: u32) -> TallyOutcome {
    if submissions.is_empty() {
        return TallyOutcome::Empty;
    }

    let mut groups: HashMap<&Signature, Vec<&SubmissionRow>> = HashMap::new();
    for row in submissions {
        if let Some(sig) = &row.signature {
            groups.entry(sig).or_default().push(row);
        }
    }

    // Largest group; ties break toward the earliest first member.
    let winning_group = groups
        .values()
        .max_by_key(|members| (members.len(), std::cmp::Reverse(members[0].id)));
    let Some(winning_group) = winning_group else {
        return TallyOutcome::Empty;
    };

    if winning_group.len() >= min_matching as usize {
        return TallyOutcome::ConfirmedDouble(winning_group[0].id);
    }

    let first_csv = submissions.iter().find(|s| s.source.is_csv());
    if groups.len() > 1 {
        match first_csv {
            Some(csv) => TallyOutcome::ConfirmedCsv(csv.id),
            None => TallyOutcome::Conflict,
        }
    } else {
        match first_csv {
            Some(csv) => TallyOutcome::ConfirmedCsv(csv.id),
            None => TallyOutcome::Unconfirmed(winning_group[0].id),
        }
    }
}
