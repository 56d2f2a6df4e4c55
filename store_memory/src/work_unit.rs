//! Work-unit table.

use crate::{lock, MemoryStore};
use recount_store::{StoreError, WorkUnitRow, WorkUnitStore};
use recount_types::{CategoryId, SubmissionId, TableId, Timestamp, UnitStatus, WorkUnitId};
use std::sync::atomic::Ordering;

impl WorkUnitStore for MemoryStore {
    fn insert_unit(
        &self,
        table: TableId,
        category: CategoryId,
    ) -> Result<WorkUnitId, StoreError> {
        let mut units = lock(&self.units)?;
        if units
            .values()
            .any(|u| u.table == table && u.category == category)
        {
            return Err(StoreError::Duplicate(format!(
                "unit for {table}/{category}"
            )));
        }
        let id = self.unit_seq.fetch_add(1, Ordering::SeqCst);
        units.insert(
            id,
            WorkUnitRow {
                id: WorkUnitId::new(id),
                table,
                category,
                status: UnitStatus::Empty,
                witness: None,
                load_order: None,
                assigned_count: 0,
                taken_at: None,
            },
        );
        Ok(WorkUnitId::new(id))
    }

    fn get_unit(&self, id: WorkUnitId) -> Result<WorkUnitRow, StoreError> {
        lock(&self.units)?
            .get(&id.raw())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn set_unit_status(
        &self,
        id: WorkUnitId,
        status: UnitStatus,
        witness: Option<SubmissionId>,
    ) -> Result<(), StoreError> {
        let mut units = lock(&self.units)?;
        let unit = units
            .get_mut(&id.raw())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        unit.status = status;
        unit.witness = witness;
        Ok(())
    }

    fn set_load_order(&self, id: WorkUnitId, order: Option<f64>) -> Result<(), StoreError> {
        let mut units = lock(&self.units)?;
        let unit = units
            .get_mut(&id.raw())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        unit.load_order = order;
        Ok(())
    }

    fn units_for_table(&self, table: TableId) -> Result<Vec<WorkUnitRow>, StoreError> {
        let mut rows: Vec<WorkUnitRow> = lock(&self.units)?
            .values()
            .filter(|u| u.table == table)
            .cloned()
            .collect();
        rows.sort_by_key(|u| u.id);
        Ok(rows)
    }

    fn units_for_category(&self, category: CategoryId) -> Result<Vec<WorkUnitRow>, StoreError> {
        let mut rows: Vec<WorkUnitRow> = lock(&self.units)?
            .values()
            .filter(|u| u.category == category)
            .cloned()
            .collect();
        rows.sort_by_key(|u| u.id);
        Ok(rows)
    }

    fn all_units(&self) -> Result<Vec<WorkUnitRow>, StoreError> {
        let mut rows: Vec<WorkUnitRow> = lock(&self.units)?.values().cloned().collect();
        rows.sort_by_key(|u| u.id);
        Ok(rows)
    }

    fn pending_units(&self) -> Result<Vec<WorkUnitRow>, StoreError> {
        let mut rows: Vec<WorkUnitRow> = lock(&self.units)?
            .values()
            .filter(|u| u.load_order.is_some() && u.status.accepts_more_votes())
            .cloned()
            .collect();
        rows.sort_by_key(|u| u.id);
        Ok(rows)
    }

    fn unit_assigned(&self, id: WorkUnitId, now: Timestamp) -> Result<(), StoreError> {
        let mut units = lock(&self.units)?;
        let unit = units
            .get_mut(&id.raw())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        unit.assigned_count += 1;
        unit.taken_at = Some(now);
        Ok(())
    }

    fn unit_released(&self, id: WorkUnitId) -> Result<(), StoreError> {
        let mut units = lock(&self.units)?;
        let unit = units
            .get_mut(&id.raw())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        unit.assigned_count = unit.assigned_count.saturating_sub(1);
        if unit.assigned_count == 0 {
            unit.taken_at = None;
        }
        Ok(())
    }

    fn try_release_expired_units(
        &self,
        timeout_secs: u64,
        now: Timestamp,
    ) -> Result<Vec<WorkUnitId>, StoreError> {
        // A sweep already in progress owns the guard; skip this round.
        let _guard = match self.sweep_guard.try_lock() {
            Ok(g) => g,
            Err(_) => return Ok(Vec::new()),
        };
        let mut released = Vec::new();
        let mut units = lock(&self.units)?;
        for unit in units.values_mut() {
            if unit.assigned_count == 0 {
                continue;
            }
            if let Some(taken) = unit.taken_at {
                if taken.has_expired(timeout_secs, now) {
                    unit.assigned_count -= 1;
                    unit.taken_at = None;
                    released.push(unit.id);
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
    fn insert_and_get_round_trip() {
        let store = MemoryStore::new();
        let id = store
            .insert_unit(TableId::new(1), CategoryId::new(2))
            .unwrap();
        let unit = store.get_unit(id).unwrap();
        assert_eq!(unit.table, TableId::new(1));
        assert_eq!(unit.status, UnitStatus::Empty);
        assert!(unit.witness.is_none());
    }

    #[test]
    fn duplicate_table_category_rejected() {
        let store = MemoryStore::new();
        store
            .insert_unit(TableId::new(1), CategoryId::new(2))
            .unwrap();
        let err = store
            .insert_unit(TableId::new(1), CategoryId::new(2))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn pending_requires_load_order() {
        let store = MemoryStore::new();
        let id = store
            .insert_unit(TableId::new(1), CategoryId::new(1))
            .unwrap();
        assert!(store.pending_units().unwrap().is_empty());

        store.set_load_order(id, Some(4.0)).unwrap();
        assert_eq!(store.pending_units().unwrap().len(), 1);

        store
            .set_unit_status(id, UnitStatus::FullConfirmedDouble, None)
            .unwrap();
        assert!(store.pending_units().unwrap().is_empty());
    }

    #[test]
    fn expired_assignments_are_released_once() {
        let store = MemoryStore::new();
        let id = store
            .insert_unit(TableId::new(1), CategoryId::new(1))
            .unwrap();
        store.unit_assigned(id, Timestamp::new(100)).unwrap();

        // Not yet expired.
        let released = store
            .try_release_expired_units(60, Timestamp::new(130))
            .unwrap();
        assert!(released.is_empty());

        let released = store
            .try_release_expired_units(60, Timestamp::new(161))
            .unwrap();
        assert_eq!(released, vec![id]);
        assert_eq!(store.get_unit(id).unwrap().assigned_count, 0);

        // Second sweep finds nothing to release.
        let released = store
            .try_release_expired_units(60, Timestamp::new(200))
            .unwrap();
        assert!(released.is_empty());
    }
}
