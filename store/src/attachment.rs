//! Attachment (photographed sheet) storage trait.

use crate::StoreError;
use recount_types::{AttachmentId, AttachmentStatus, IdentificationId, TableId, Timestamp};
use serde::{Deserialize, Serialize};

/// A photographed tally sheet and the table it currently resolves to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRow {
    pub id: AttachmentId,
    pub status: AttachmentStatus,
    pub table: Option<TableId>,
    pub witness: Option<IdentificationId>,
    pub assigned_count: u32,
    pub taken_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

pub trait AttachmentStore {
    fn insert_attachment(&self, now: Timestamp) -> Result<AttachmentId, StoreError>;

    fn get_attachment(&self, id: AttachmentId) -> Result<AttachmentRow, StoreError>;

    /// Persist the identification outcome.
    fn set_attachment_resolution(
        &self,
        id: AttachmentId,
        status: AttachmentStatus,
        table: Option<TableId>,
        witness: Option<IdentificationId>,
    ) -> Result<(), StoreError>;

    /// Attachments still needing identification work.
    fn pending_attachments(&self) -> Result<Vec<AttachmentRow>, StoreError>;

    /// Attachments currently resolved to the given table.
    fn attachments_for_table(&self, table: TableId) -> Result<Vec<AttachmentRow>, StoreError>;

    fn attachment_assigned(&self, id: AttachmentId, now: Timestamp) -> Result<(), StoreError>;

    fn attachment_released(&self, id: AttachmentId) -> Result<(), StoreError>;

    /// Same discipline as `try_release_expired_units`.
    fn try_release_expired_attachments(
        &self,
        timeout_secs: u64,
        now: Timestamp,
    ) -> Result<Vec<AttachmentId>, StoreError>;
}
