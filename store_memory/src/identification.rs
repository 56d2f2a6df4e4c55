//! Identification table.

use crate::{lock, MemoryStore};
use recount_store::{IdentificationRow, IdentificationStore, NewIdentification, StoreError};
use recount_types::{AttachmentId, IdentificationId, SubmitterId};
use std::collections::HashSet;
use std::sync::atomic::Ordering;

impl IdentificationStore for MemoryStore {
    fn insert_identification(
        &self,
        new: NewIdentification,
    ) -> Result<IdentificationId, StoreError> {
        let id = self.identification_seq.fetch_add(1, Ordering::SeqCst);
        let row = IdentificationRow {
            id: IdentificationId::new(id),
            attachment: new.attachment,
            submitter: new.submitter,
            claim: new.claim,
            source: new.source,
            processed: new.processed,
            invalidated: new.invalidated,
            created_at: new.created_at,
        };
        lock(&self.identifications)?.insert(id, row);
        Ok(IdentificationId::new(id))
    }

    fn get_identification(&self, id: IdentificationId) -> Result<IdentificationRow, StoreError> {
        lock(&self.identifications)?
            .get(&id.raw())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn live_identifications_for(
        &self,
        attachment: AttachmentId,
    ) -> Result<Vec<IdentificationRow>, StoreError> {
        let mut rows: Vec<IdentificationRow> = lock(&self.identifications)?
            .values()
            .filter(|i| i.attachment == attachment && !i.invalidated)
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.id);
        Ok(rows)
    }

    fn attachments_with_unprocessed(&self) -> Result<Vec<AttachmentId>, StoreError> {
        let set: HashSet<AttachmentId> = lock(&self.identifications)?
            .values()
            .filter(|i| !i.processed)
            .map(|i| i.attachment)
            .collect();
        let mut out: Vec<AttachmentId> = set.into_iter().collect();
        out.sort();
        Ok(out)
    }

    fn unprocessed_ids_for_attachment(
        &self,
        attachment: AttachmentId,
    ) -> Result<Vec<IdentificationId>, StoreError> {
        let mut ids: Vec<IdentificationId> = lock(&self.identifications)?
            .values()
            .filter(|i| i.attachment == attachment && !i.processed)
            .map(|i| i.id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn mark_identifications_processed(
        &self,
        ids: &[IdentificationId],
    ) -> Result<(), StoreError> {
        let mut rows = lock(&self.identifications)?;
        for id in ids {
            let row = rows
                .get_mut(&id.raw())
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            row.processed = true;
        }
        Ok(())
    }

    fn invalidate_identification(&self, id: IdentificationId) -> Result<(), StoreError> {
        let mut rows = lock(&self.identifications)?;
        let row = rows
            .get_mut(&id.raw())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        row.invalidated = true;
        row.processed = false;
        Ok(())
    }

    fn live_identifications_by(
        &self,
        submitter: SubmitterId,
    ) -> Result<Vec<IdentificationRow>, StoreError> {
        let mut rows: Vec<IdentificationRow> = lock(&self.identifications)?
            .values()
            .filter(|i| i.submitter == submitter && !i.invalidated)
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.id);
        Ok(rows)
    }

    fn attachments_touched_by(
        &self,
        submitter: SubmitterId,
    ) -> Result<Vec<AttachmentId>, StoreError> {
        let set: HashSet<AttachmentId> = lock(&self.identifications)?
            .values()
            .filter(|i| i.submitter == submitter)
            .map(|i| i.attachment)
            .collect();
        let mut out: Vec<AttachmentId> = set.into_iter().collect();
        out.sort();
        Ok(out)
    }
}
