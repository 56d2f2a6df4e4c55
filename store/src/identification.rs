//! Photo-identification submission storage trait.

use crate::StoreError;
use recount_types::{
    AttachmentId, IdentificationClaim, IdentificationId, SubmissionSource, SubmitterId, Timestamp,
};
use serde::{Deserialize, Serialize};

/// One volunteer's claim about which table a photo belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdentificationRow {
    pub id: IdentificationId,
    pub attachment: AttachmentId,
    pub submitter: SubmitterId,
    pub claim: IdentificationClaim,
    pub source: SubmissionSource,
    pub processed: bool,
    pub invalidated: bool,
    pub created_at: Timestamp,
}

#[derive(Clone, Debug)]
pub struct NewIdentification {
    pub attachment: AttachmentId,
    pub submitter: SubmitterId,
    pub claim: IdentificationClaim,
    pub source: SubmissionSource,
    pub invalidated: bool,
    pub processed: bool,
    pub created_at: Timestamp,
}

pub trait IdentificationStore {
    fn insert_identification(&self, new: NewIdentification)
        -> Result<IdentificationId, StoreError>;

    fn get_identification(&self, id: IdentificationId) -> Result<IdentificationRow, StoreError>;

    /// All non-invalidated identifications for an attachment.
    fn live_identifications_for(
        &self,
        attachment: AttachmentId,
    ) -> Result<Vec<IdentificationRow>, StoreError>;

    /// Distinct attachments that currently have unprocessed rows.
    /// Invalidated rows count, as for units.
    fn attachments_with_unprocessed(&self) -> Result<Vec<AttachmentId>, StoreError>;

    /// The captured id set for one attachment.
    fn unprocessed_ids_for_attachment(
        &self,
        attachment: AttachmentId,
    ) -> Result<Vec<IdentificationId>, StoreError>;

    fn mark_identifications_processed(&self, ids: &[IdentificationId]) -> Result<(), StoreError>;

    fn invalidate_identification(&self, id: IdentificationId) -> Result<(), StoreError>;

    fn live_identifications_by(
        &self,
        submitter: SubmitterId,
    ) -> Result<Vec<IdentificationRow>, StoreError>;

    /// Attachments this submitter has ever identified (claim exclusion).
    fn attachments_touched_by(
        &self,
        submitter: SubmitterId,
    ) -> Result<Vec<AttachmentId>, StoreError>;
}
