//! Vote-count submission storage trait.

use crate::StoreError;
use recount_types::{
    ReportedVotes, Signature, SubmissionId, SubmissionKind, SubmissionSource, SubmitterId,
    Timestamp, WorkUnitId,
};
use serde::{Deserialize, Serialize};

/// One volunteer's vote-count claim about a work unit.
///
/// Rows are never deleted; an invalidated row stays for the audit trail but
/// leaves the voting pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub id: SubmissionId,
    pub unit: WorkUnitId,
    pub submitter: SubmitterId,
    pub kind: SubmissionKind,
    pub source: SubmissionSource,
    pub reported: ReportedVotes,
    /// Canonical value string; recomputed on demand by the engine.
    pub signature: Option<Signature>,
    pub processed: bool,
    pub invalidated: bool,
    pub created_at: Timestamp,
}

/// Fields the caller supplies when inserting a submission.
#[derive(Clone, Debug)]
pub struct NewSubmission {
    pub unit: WorkUnitId,
    pub submitter: SubmitterId,
    pub kind: SubmissionKind,
    pub source: SubmissionSource,
    pub reported: ReportedVotes,
    /// Dead-on-arrival rows (from already-untrusted submitters) are created
    /// with `invalidated = true, processed = true`.
    pub invalidated: bool,
    pub processed: bool,
    pub created_at: Timestamp,
}

pub trait SubmissionStore {
    fn insert_submission(&self, new: NewSubmission) -> Result<SubmissionId, StoreError>;

    fn get_submission(&self, id: SubmissionId) -> Result<SubmissionRow, StoreError>;

    /// All non-invalidated submissions for a unit.
    fn live_submissions_for_unit(&self, unit: WorkUnitId)
        -> Result<Vec<SubmissionRow>, StoreError>;

    /// Distinct units that currently have unprocessed rows. Invalidated
    /// rows count: flipping a row to `invalidated, unprocessed` is exactly
    /// how the cascade re-queues its unit.
    fn units_with_unprocessed(&self) -> Result<Vec<WorkUnitId>, StoreError>;

    /// The captured id set for one unit: its unprocessed rows at call time.
    fn unprocessed_ids_for_unit(&self, unit: WorkUnitId)
        -> Result<Vec<SubmissionId>, StoreError>;

    /// Mark exactly the given rows processed.
    fn mark_submissions_processed(&self, ids: &[SubmissionId]) -> Result<(), StoreError>;

    fn set_submission_signature(
        &self,
        id: SubmissionId,
        signature: Signature,
    ) -> Result<(), StoreError>;

    /// Retire a row: `invalidated = true, processed = false`, so the next
    /// driver run re-reconciles its unit without it.
    fn invalidate_submission(&self, id: SubmissionId) -> Result<(), StoreError>;

    /// Non-invalidated submissions by one submitter (cascade input).
    fn live_submissions_by(&self, submitter: SubmitterId)
        -> Result<Vec<SubmissionRow>, StoreError>;

    /// Units this submitter has ever submitted to (claim exclusion).
    fn units_touched_by(&self, submitter: SubmitterId) -> Result<Vec<WorkUnitId>, StoreError>;
}
