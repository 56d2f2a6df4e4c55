//! Reconciliation outcomes.

use recount_types::{SubmissionId, UnitStatus};

/// Which voting tier produced an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Partial,
    Full,
}

/// The result of running the voting rule over one tier of submissions.
///
/// The tagged variants replace "no winner" control flow: every branch of the
/// voting rule maps to exactly one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TallyOutcome {
    /// No submissions in this tier.
    Empty,
    /// Confirmed problem reports; count-based logic suppressed.
    HasProblem,
    /// Enough matching signatures; the winner is the witness.
    ConfirmedDouble(SubmissionId),
    /// No duplicate match, but a CSV submission breaks the tie.
    ConfirmedCsv(SubmissionId),
    /// Multiple divergent signatures and no CSV tiebreaker.
    Conflict,
    /// A single uncorroborated signature.
    Unconfirmed(SubmissionId),
}

impl TallyOutcome {
    /// The witness this outcome selects, if any.
    pub fn witness(&self) -> Option<SubmissionId> {
        match self {
            TallyOutcome::ConfirmedDouble(w)
            | TallyOutcome::ConfirmedCsv(w)
            | TallyOutcome::Unconfirmed(w) => Some(*w),
            TallyOutcome::Empty | TallyOutcome::HasProblem | TallyOutcome::Conflict => None,
        }
    }

    /// Whether the full tier may run after this partial-tier outcome.
    pub fn allows_full_tier(&self) -> bool {
        matches!(
            self,
            TallyOutcome::Empty
                | TallyOutcome::ConfirmedDouble(_)
                | TallyOutcome::ConfirmedCsv(_)
        )
    }

    pub fn is_confirmed_double(&self) -> bool {
        matches!(self, TallyOutcome::ConfirmedDouble(_))
    }

    /// Map the outcome onto the unit status for the tier that produced it.
    pub fn status_for(&self, tier: Tier) -> UnitStatus {
        match (self, tier) {
            (TallyOutcome::Empty, _) => UnitStatus::Empty,
            (TallyOutcome::HasProblem, _) => UnitStatus::HasProblem,
            (TallyOutcome::ConfirmedDouble(_), Tier::Partial) => UnitStatus::PartialConfirmedDouble,
            (TallyOutcome::ConfirmedDouble(_), Tier::Full) => UnitStatus::FullConfirmedDouble,
            (TallyOutcome::ConfirmedCsv(_), Tier::Partial) => UnitStatus::PartialConfirmedCsv,
            (TallyOutcome::ConfirmedCsv(_), Tier::Full) => UnitStatus::FullConfirmedCsv,
            (TallyOutcome::Conflict, Tier::Partial) => UnitStatus::PartialInConflict,
            (TallyOutcome::Conflict, Tier::Full) => UnitStatus::FullInConflict,
            (TallyOutcome::Unconfirmed(_), Tier::Partial) => UnitStatus::PartialUnconfirmed,
            (TallyOutcome::Unconfirmed(_), Tier::Full) => UnitStatus::FullUnconfirmed,
        }
    }
}
