//! Reputation ledger storage trait.
//!
//! Ledger entries and trust changes are append-only; a submitter's score is
//! always the sum of their entry deltas, never a stored counter.

use crate::StoreError;
use recount_types::{
    AttachmentId, ReputationEventId, ScoringCause, SubmitterId, TableId, Timestamp, WorkUnitId,
};
use serde::{Deserialize, Serialize};

/// One immutable reputation delta and its cause.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReputationEventRow {
    pub id: ReputationEventId,
    pub submitter: SubmitterId,
    pub delta: i64,
    pub cause: ScoringCause,
    /// False for operator-issued entries.
    pub automatic: bool,
    /// The deciding operator, for non-automatic entries.
    pub actor: Option<SubmitterId>,
    pub unit: Option<WorkUnitId>,
    pub attachment: Option<AttachmentId>,
    pub table: Option<TableId>,
    pub at: Timestamp,
}

#[derive(Clone, Debug)]
pub struct NewReputationEvent {
    pub submitter: SubmitterId,
    pub delta: i64,
    pub cause: ScoringCause,
    pub automatic: bool,
    pub actor: Option<SubmitterId>,
    pub unit: Option<WorkUnitId>,
    pub attachment: Option<AttachmentId>,
    pub table: Option<TableId>,
    pub at: Timestamp,
}

/// One trusted/untrusted flip, referencing the entry that triggered it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrustChangeRow {
    pub submitter: SubmitterId,
    pub untrusted: bool,
    pub automatic: bool,
    pub actor: Option<SubmitterId>,
    pub trigger: ReputationEventId,
    pub at: Timestamp,
}

#[derive(Clone, Debug)]
pub struct NewTrustChange {
    pub submitter: SubmitterId,
    pub untrusted: bool,
    pub automatic: bool,
    pub actor: Option<SubmitterId>,
    pub trigger: ReputationEventId,
    pub at: Timestamp,
}

pub trait ReputationStore {
    fn append_reputation_event(
        &self,
        new: NewReputationEvent,
    ) -> Result<ReputationEventId, StoreError>;

    fn reputation_events_for(
        &self,
        submitter: SubmitterId,
    ) -> Result<Vec<ReputationEventRow>, StoreError>;

    /// Sum of deltas. Zero for a submitter with no entries.
    fn reputation_score(&self, submitter: SubmitterId) -> Result<i64, StoreError>;

    fn is_untrusted(&self, submitter: SubmitterId) -> Result<bool, StoreError>;

    fn set_untrusted(&self, submitter: SubmitterId, untrusted: bool) -> Result<(), StoreError>;

    fn append_trust_change(&self, new: NewTrustChange) -> Result<(), StoreError>;

    fn trust_changes_for(
        &self,
        submitter: SubmitterId,
    ) -> Result<Vec<TrustChangeRow>, StoreError>;
}
