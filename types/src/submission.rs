//! Submission kinds, sources, reported values, and canonical signatures.

use crate::ids::{OptionId, TableId};
use crate::status::ProblemKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a vote-count submission claims to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionKind {
    /// "This sheet has a problem" — no counts reported.
    Problem,
    /// Counts for the priority options only.
    Partial,
    /// Counts for every option of the category.
    Full,
}

/// The channel a submission arrived through.
///
/// CSV submissions come from party head offices in bulk and outrank
/// interactive web submissions when signatures diverge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionSource {
    Web,
    Csv,
    Telegram,
}

impl SubmissionSource {
    pub fn is_csv(&self) -> bool {
        matches!(self, SubmissionSource::Csv)
    }
}

/// One reported cell: an option and the vote count read off the sheet.
///
/// `votes` is `None` when a partial submission leaves the cell blank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteEntry {
    pub option: OptionId,
    pub votes: Option<u32>,
}

/// The full set of values one submission reports.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedVotes(pub Vec<VoteEntry>);

impl ReportedVotes {
    pub fn new(entries: Vec<VoteEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[VoteEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compute the canonical signature: `<option>-<votes>|...`, ordered by
    /// option id, with an empty count for blank cells. Two submissions agree
    /// exactly when their signatures are equal.
    pub fn signature(&self) -> Signature {
        let mut entries = self.0.clone();
        entries.sort_by_key(|e| e.option);
        let parts: Vec<String> = entries
            .iter()
            .map(|e| match e.votes {
                Some(v) => format!("{}-{}", e.option.raw(), v),
                None => format!("{}-", e.option.raw()),
            })
            .collect();
        Signature(parts.join("|"))
    }
}

/// Canonical string encoding of a submission's reported values.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature(pub String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an identification submission claims about a photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentificationClaim {
    /// "This photo is the sheet of table X."
    Table(TableId),
    /// "This photo has a problem" (wrong content, unreadable, ...).
    Problem(ProblemKind),
}

impl IdentificationClaim {
    pub fn table(&self) -> Option<TableId> {
        match self {
            IdentificationClaim::Table(t) => Some(*t),
            IdentificationClaim::Problem(_) => None,
        }
    }
}
