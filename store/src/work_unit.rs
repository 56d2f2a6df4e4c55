//! Work-unit storage trait.

use crate::StoreError;
use recount_types::{CategoryId, SubmissionId, TableId, Timestamp, UnitStatus, WorkUnitId};
use serde::{Deserialize, Serialize};

/// One (table, category) pair awaiting a vote-count consensus.
///
/// `status` and `witness` are owned by the consolidation engine; `load_order`
/// and the assignment fields are owned by the scheduler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkUnitRow {
    pub id: WorkUnitId,
    pub table: TableId,
    pub category: CategoryId,
    pub status: UnitStatus,
    pub witness: Option<SubmissionId>,
    /// Priority coefficient; `None` until the unit's table has an identified
    /// attachment (a unit without a photo cannot be worked on).
    pub load_order: Option<f64>,
    /// Workers currently holding this unit.
    pub assigned_count: u32,
    /// When the most recent assignment was handed out.
    pub taken_at: Option<Timestamp>,
}

pub trait WorkUnitStore {
    /// Create a work unit at setup time. One per table×category.
    fn insert_unit(&self, table: TableId, category: CategoryId)
        -> Result<WorkUnitId, StoreError>;

    fn get_unit(&self, id: WorkUnitId) -> Result<WorkUnitRow, StoreError>;

    /// Persist the consolidation outcome.
    fn set_unit_status(
        &self,
        id: WorkUnitId,
        status: UnitStatus,
        witness: Option<SubmissionId>,
    ) -> Result<(), StoreError>;

    fn set_load_order(&self, id: WorkUnitId, order: Option<f64>) -> Result<(), StoreError>;

    fn units_for_table(&self, table: TableId) -> Result<Vec<WorkUnitRow>, StoreError>;

    fn units_for_category(&self, category: CategoryId) -> Result<Vec<WorkUnitRow>, StoreError>;

    fn all_units(&self) -> Result<Vec<WorkUnitRow>, StoreError>;

    /// Units that can take more vote-count work: identified (load order set)
    /// and neither fully consolidated nor problem-flagged.
    fn pending_units(&self) -> Result<Vec<WorkUnitRow>, StoreError>;

    /// Record that one more worker now holds this unit.
    fn unit_assigned(&self, id: WorkUnitId, now: Timestamp) -> Result<(), StoreError>;

    /// Record that a worker released (or finished with) this unit.
    fn unit_released(&self, id: WorkUnitId) -> Result<(), StoreError>;

    /// Release every unit whose newest assignment is older than
    /// `timeout_secs`. Non-blocking: returns `Ok(vec![])` when the sweep
    /// cannot take its lock immediately.
    fn try_release_expired_units(
        &self,
        timeout_secs: u64,
        now: Timestamp,
    ) -> Result<Vec<WorkUnitId>, StoreError>;
}
