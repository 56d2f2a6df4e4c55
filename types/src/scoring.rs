//! Reputation scoring causes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a reputation ledger entry was written.
///
/// Automatic causes are side effects of consolidation outcomes; the explicit
/// ones record operator decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringCause {
    /// Submitted counts diverging from the confirmed witness.
    DivergentLoad,
    /// Reported a problem on a unit whose count later confirmed.
    ProblemOnConfirmedUnit,
    /// Identified a photo differently from the confirmed table.
    DivergentIdentification,
    /// An operator dismissed a problem this submitter reported.
    ProblemRejected,
    /// An operator explicitly marked the submitter untrusted.
    ExplicitMark,
    /// An operator explicitly cleared the untrusted mark.
    MarkRemoval,
    /// Submitted the counts that won confirmation.
    ConfirmedLoad,
    /// Identified the photo the way that won confirmation.
    ConfirmedIdentification,
}

impl fmt::Display for ScoringCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoringCause::DivergentLoad => "divergent-load",
            ScoringCause::ProblemOnConfirmedUnit => "problem-on-confirmed-unit",
            ScoringCause::DivergentIdentification => "divergent-identification",
            ScoringCause::ProblemRejected => "problem-rejected",
            ScoringCause::ExplicitMark => "explicit-mark",
            ScoringCause::MarkRemoval => "mark-removal",
            ScoringCause::ConfirmedLoad => "confirmed-load",
            ScoringCause::ConfirmedIdentification => "confirmed-identification",
        };
        f.write_str(s)
    }
}
