//! Pending-work queue table.

use crate::{lock, MemoryStore};
use recount_store::{NewQueueEntry, QueueEntryRow, QueueStore, StoreError, TaskRef};
use recount_types::{CircuitId, QueueEntryId};
use std::sync::atomic::Ordering;

impl QueueStore for MemoryStore {
    fn enqueue(&self, new: NewQueueEntry) -> Result<QueueEntryId, StoreError> {
        let id = self.queue_seq.fetch_add(1, Ordering::SeqCst);
        let row = QueueEntryRow {
            id: QueueEntryId::new(id),
            order: new.order,
            task: new.task,
            circuit: new.circuit,
        };
        lock(&self.queue)?.insert((new.order, id), row);
        Ok(QueueEntryId::new(id))
    }

    fn queue_len(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.queue)?.len())
    }

    fn queue_contains(&self, task: TaskRef) -> Result<bool, StoreError> {
        Ok(lock(&self.queue)?.values().any(|e| e.task == task))
    }

    fn try_claim(
        &self,
        exclude: &[TaskRef],
        affinity: Option<CircuitId>,
        affinity_bonus: i64,
    ) -> Result<Option<QueueEntryRow>, StoreError> {
        // Claims never wait on a contended queue; no claim this round.
        let mut queue = match self.queue.try_lock() {
            Ok(q) => q,
            Err(std::sync::TryLockError::WouldBlock) => return Ok(None),
            Err(std::sync::TryLockError::Poisoned(_)) => {
                return Err(StoreError::Backend("poisoned lock".into()))
            }
        };

        let best = queue
            .values()
            .filter(|e| !exclude.contains(&e.task))
            .map(|e| {
                let bonus = match (affinity, e.circuit) {
                    (Some(a), Some(c)) if a == c => affinity_bonus,
                    _ => 0,
                };
                (e.order - bonus, e.id, e.order)
            })
            .min();

        match best {
            Some((_, id, order)) => Ok(queue.remove(&(order, id.raw()))),
            None => Ok(None),
        }
    }

    fn queue_entries(&self) -> Result<Vec<QueueEntryRow>, StoreError> {
        Ok(lock(&self.queue)?.values().cloned().collect())
    }

    fn clear_queue(&self) -> Result<(), StoreError> {
        lock(&self.queue)?.clear();
        Ok(())
    }
}
