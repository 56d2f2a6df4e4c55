//! Vote-count submission table.

use crate::{lock, MemoryStore};
use recount_store::{NewSubmission, StoreError, SubmissionRow, SubmissionStore};
use recount_types::{Signature, SubmissionId, SubmitterId, WorkUnitId};
use std::collections::HashSet;
use std::sync::atomic::Ordering;

impl SubmissionStore for MemoryStore {
    fn insert_submission(&self, new: NewSubmission) -> Result<SubmissionId, StoreError> {
        let id = self.submission_seq.fetch_add(1, Ordering::SeqCst);
        let row = SubmissionRow {
            id: SubmissionId::new(id),
            unit: new.unit,
            submitter: new.submitter,
            kind: new.kind,
            source: new.source,
            reported: new.reported,
            signature: None,
            processed: new.processed,
            invalidated: new.invalidated,
            created_at: new.created_at,
        };
        lock(&self.submissions)?.insert(id, row);
        Ok(SubmissionId::new(id))
    }

    fn get_submission(&self, id: SubmissionId) -> Result<SubmissionRow, StoreError> {
        lock(&self.submissions)?
            .get(&id.raw())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn live_submissions_for_unit(
        &self,
        unit: WorkUnitId,
    ) -> Result<Vec<SubmissionRow>, StoreError> {
        let mut rows: Vec<SubmissionRow> = lock(&self.submissions)?
            .values()
            .filter(|s| s.unit == unit && !s.invalidated)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.id);
        Ok(rows)
    }

    fn units_with_unprocessed(&self) -> Result<Vec<WorkUnitId>, StoreError> {
        let units: HashSet<WorkUnitId> = lock(&self.submissions)?
            .values()
            .filter(|s| !s.processed)
            .map(|s| s.unit)
            .collect();
        let mut units: Vec<WorkUnitId> = units.into_iter().collect();
        units.sort();
        Ok(units)
    }

    fn unprocessed_ids_for_unit(
        &self,
        unit: WorkUnitId,
    ) -> Result<Vec<SubmissionId>, StoreError> {
        let mut ids: Vec<SubmissionId> = lock(&self.submissions)?
            .values()
            .filter(|s| s.unit == unit && !s.processed)
            .map(|s| s.id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn mark_submissions_processed(&self, ids: &[SubmissionId]) -> Result<(), StoreError> {
        let mut rows = lock(&self.submissions)?;
        for id in ids {
            let row = rows
                .get_mut(&id.raw())
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            row.processed = true;
        }
        Ok(())
    }

    fn set_submission_signature(
        &self,
        id: SubmissionId,
        signature: Signature,
    ) -> Result<(), StoreError> {
        let mut rows = lock(&self.submissions)?;
        let row = rows
            .get_mut(&id.raw())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        row.signature = Some(signature);
        Ok(())
    }

    fn invalidate_submission(&self, id: SubmissionId) -> Result<(), StoreError> {
        let mut rows = lock(&self.submissions)?;
        let row = rows
            .get_mut(&id.raw())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        row.invalidated = true;
        row.processed = false;
        Ok(())
    }

    fn live_submissions_by(
        &self,
        submitter: SubmitterId,
    ) -> Result<Vec<SubmissionRow>, StoreError> {
        let mut rows: Vec<SubmissionRow> = lock(&self.submissions)?
            .values()
            .filter(|s| s.submitter == submitter && !s.invalidated)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.id);
        Ok(rows)
    }

    fn units_touched_by(&self, submitter: SubmitterId) -> Result<Vec<WorkUnitId>, StoreError> {
        let units: HashSet<WorkUnitId> = lock(&self.submissions)?
            .values()
            .filter(|s| s.submitter == submitter)
            .map(|s| s.unit)
            .collect();
        let mut units: Vec<WorkUnitId> = units.into_iter().collect();
        units.sort();
        Ok(units)
    }
}
