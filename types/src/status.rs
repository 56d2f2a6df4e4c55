//! Status enums for work units, attachments, and problems.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Consolidation status of a work unit.
///
/// The variant order is meaningful: it runs from least to most advanced, and
/// the scheduler sorts pending units ascending so the least-advanced work is
/// handed out first. `HasProblem` sorts last because problem units leave the
/// scheduling pool entirely.
///
/// A unit's status is always derivable from its currently non-invalidated
/// submissions; only the consolidation engine and the invalidation cascade
/// write it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitStatus {
    /// No live submissions at all.
    Empty,
    /// A single partial-count signature, not from CSV.
    PartialUnconfirmed,
    /// Divergent partial signatures and no CSV tiebreaker.
    PartialInConflict,
    /// Partial count backed by a CSV submission.
    PartialConfirmedCsv,
    /// Partial count confirmed by matching duplicates.
    PartialConfirmedDouble,
    /// A single full-count signature, not from CSV.
    FullUnconfirmed,
    /// Divergent full signatures and no CSV tiebreaker.
    FullInConflict,
    /// Full count backed by a CSV submission.
    FullConfirmedCsv,
    /// Full count confirmed by matching duplicates. Terminal for scheduling.
    FullConfirmedDouble,
    /// Confirmed problem reports suppress count-based logic.
    HasProblem,
}

impl UnitStatus {
    /// Whether this status was reached by matching duplicate submissions.
    pub fn is_confirmed_double(&self) -> bool {
        matches!(
            self,
            UnitStatus::PartialConfirmedDouble | UnitStatus::FullConfirmedDouble
        )
    }

    /// Whether the unit needs only one more matching submission: a CSV-backed
    /// or conflicted unit is one vote away from consolidation either way.
    pub fn needs_single_vote(&self) -> bool {
        matches!(
            self,
            UnitStatus::PartialConfirmedCsv
                | UnitStatus::PartialInConflict
                | UnitStatus::FullConfirmedCsv
                | UnitStatus::FullInConflict
        )
    }

    /// Whether the unit still takes vote-count work. Fully consolidated and
    /// problem units are out of the pool.
    pub fn accepts_more_votes(&self) -> bool {
        !matches!(self, UnitStatus::FullConfirmedDouble | UnitStatus::HasProblem)
    }

    /// Whether the partial-tier result allows the full tier to run.
    pub fn partial_tier_allows_full(&self) -> bool {
        matches!(
            self,
            UnitStatus::Empty
                | UnitStatus::PartialConfirmedDouble
                | UnitStatus::PartialConfirmedCsv
        )
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitStatus::Empty => "empty",
            UnitStatus::PartialUnconfirmed => "partial-unconfirmed",
            UnitStatus::PartialInConflict => "partial-in-conflict",
            UnitStatus::PartialConfirmedCsv => "partial-confirmed-csv",
            UnitStatus::PartialConfirmedDouble => "partial-confirmed-double",
            UnitStatus::FullUnconfirmed => "full-unconfirmed",
            UnitStatus::FullInConflict => "full-in-conflict",
            UnitStatus::FullConfirmedCsv => "full-confirmed-csv",
            UnitStatus::FullConfirmedDouble => "full-confirmed-double",
            UnitStatus::HasProblem => "has-problem",
        };
        f.write_str(s)
    }
}

/// Identification status of an attachment (a photographed sheet).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentStatus {
    /// No table has won the identification vote yet.
    Unidentified,
    /// Resolved to a table via matching identifications or a CSV one.
    Identified,
    /// Confirmed problem reports (not a valid photo, illegible, ...).
    HasProblem,
}

/// The kind of problem a volunteer can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProblemKind {
    /// The tally sheet for a table never showed up.
    MissingSheet,
    /// The sheet exists but cannot be read.
    IllegibleSheet,
    /// The upload is not a tally-sheet photo at all.
    InvalidPhoto,
}

/// Lifecycle of a problem report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemState {
    /// Reported but below the confirmation threshold.
    Reported,
    /// Enough matching reports arrived; the engine confirmed it.
    Confirmed,
    /// Cleared, e.g. a missing sheet's photo finally consolidated.
    Resolved,
}
