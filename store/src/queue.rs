//! Pending-work queue storage trait.

use crate::StoreError;
use recount_types::{AttachmentId, CircuitId, QueueEntryId, WorkUnitId};
use serde::{Deserialize, Serialize};

/// What a queue entry hands out when claimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskRef {
    /// One more vote-count submission is needed here.
    Unit(WorkUnitId),
    /// One more identification is needed here.
    Attachment(AttachmentId),
}

/// One claimable unit of outstanding work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueEntryRow {
    pub id: QueueEntryId,
    /// Total-order key; claims take the lowest effective order.
    pub order: i64,
    pub task: TaskRef,
    /// Denormalized geography tag for affinity scoring.
    pub circuit: Option<CircuitId>,
}

#[derive(Clone, Debug)]
pub struct NewQueueEntry {
    pub order: i64,
    pub task: TaskRef,
    pub circuit: Option<CircuitId>,
}

pub trait QueueStore {
    fn enqueue(&self, new: NewQueueEntry) -> Result<QueueEntryId, StoreError>;

    fn queue_len(&self) -> Result<usize, StoreError>;

    /// Whether any entry already points at the given task (rebuild dedup).
    fn queue_contains(&self, task: TaskRef) -> Result<bool, StoreError>;

    /// Atomically claim and delete the entry with the lowest effective
    /// order, where entries whose circuit equals `affinity` get
    /// `affinity_bonus` subtracted, and entries whose task appears in
    /// `exclude` are skipped. Non-blocking: contention yields `Ok(None)`.
    fn try_claim(
        &self,
        exclude: &[TaskRef],
        affinity: Option<CircuitId>,
        affinity_bonus: i64,
    ) -> Result<Option<QueueEntryRow>, StoreError>;

    /// Every entry, lowest order first. Diagnostics and tests.
    fn queue_entries(&self) -> Result<Vec<QueueEntryRow>, StoreError>;

    /// Drop all entries (wholesale rebuild).
    fn clear_queue(&self) -> Result<(), StoreError>;
}
