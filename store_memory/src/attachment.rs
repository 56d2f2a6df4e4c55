//! Attachment table.

use crate::{lock, MemoryStore};
use recount_store::{AttachmentRow, AttachmentStore, StoreError};
use recount_types::{AttachmentId, AttachmentStatus, IdentificationId, TableId, Timestamp};
use std::sync::atomic::Ordering;

impl AttachmentStore for MemoryStore {
    fn insert_attachment(&self, now: Timestamp) -> Result<AttachmentId, StoreError> {
        let id = self.attachment_seq.fetch_add(1, Ordering::SeqCst);
        lock(&self.attachments)?.insert(
            id,
            AttachmentRow {
                id: AttachmentId::new(id),
                status: AttachmentStatus::Unidentified,
                table: None,
                witness: None,
                assigned_count: 0,
                taken_at: None,
                created_at: now,
            },
        );
        Ok(AttachmentId::new(id))
    }

    fn get_attachment(&self, id: AttachmentId) -> Result<AttachmentRow, StoreError> {
        lock(&self.attachments)?
            .get(&id.raw())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn set_attachment_resolution(
        &self,
        id: AttachmentId,
        status: AttachmentStatus,
        table: Option<TableId>,
        witness: Option<IdentificationId>,
    ) -> Result<(), StoreError> {
        let mut rows = lock(&self.attachments)?;
        let row = rows
            .get_mut(&id.raw())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        row.status = status;
        row.table = table;
        row.witness = witness;
        Ok(())
    }

    fn pending_attachments(&self) -> Result<Vec<AttachmentRow>, StoreError> {
        let mut rows: Vec<AttachmentRow> = lock(&self.attachments)?
            .values()
            .filter(|a| a.status == AttachmentStatus::Unidentified)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.id);
        Ok(rows)
    }

    fn attachments_for_table(&self, table: TableId) -> Result<Vec<AttachmentRow>, StoreError> {
        let mut rows: Vec<AttachmentRow> = lock(&self.attachments)?
            .values()
            .filter(|a| a.table == Some(table))
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.id);
        Ok(rows)
    }

    fn attachment_assigned(&self, id: AttachmentId, now: Timestamp) -> Result<(), StoreError> {
        let mut rows = lock(&self.attachments)?;
        let row = rows
            .get_mut(&id.raw())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        row.assigned_count += 1;
        row.taken_at = Some(now);
        Ok(())
    }

    fn attachment_released(&self, id: AttachmentId) -> Result<(), StoreError> {
        let mut rows = lock(&self.attachments)?;
        let row = rows
            .get_mut(&id.raw())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        row.assigned_count = row.assigned_count.saturating_sub(1);
        if row.assigned_count == 0 {
            row.taken_at = None;
        }
        Ok(())
    }

    fn try_release_expired_attachments(
        &self,
        timeout_secs: u64,
        now: Timestamp,
    ) -> Result<Vec<AttachmentId>, StoreError> {
        let _guard = match self.sweep_guard.try_lock() {
            Ok(g) => g,
            Err(_) => return Ok(Vec::new()),
        };
        let mut released = Vec::new();
        let mut rows = lock(&self.attachments)?;
        for row in rows.values_mut() {
            if row.assigned_count == 0 {
                continue;
            }
            if let Some(taken) = row.taken_at {
                if taken.has_expired(timeout_secs, now) {
                    row.assigned_count -= 1;
                    row.taken_at = None;
                    released.push(row.id);
                }
            }
        }
        released.sort();
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_updates_all_three_fields() {
        let store = MemoryStore::new();
        let id = store.insert_attachment(Timestamp::new(1)).unwrap();
        store
            .set_attachment_resolution(
                id,
                AttachmentStatus::Identified,
                Some(TableId::new(9)),
                Some(IdentificationId::new(1)),
            )
            .unwrap();
        let row = store.get_attachment(id).unwrap();
        assert_eq!(row.status, AttachmentStatus::Identified);
        assert_eq!(row.table, Some(TableId::new(9)));

        assert!(store.pending_attachments().unwrap().is_empty());
        assert_eq!(
            store.attachments_for_table(TableId::new(9)).unwrap().len(),
            1
        );
    }
}
