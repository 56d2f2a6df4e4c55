//! Claiming the next task.

use crate::load_order::refresh_unit_load_order;
use crate::SchedulerError;
use recount_store::{AttachmentRow, Store, TaskRef, WorkUnitRow};
use recount_types::{EngineSettings, SubmitterId, Timestamp};
use tracing::debug;

/// What a worker receives from a claim.
#[derive(Clone, Debug)]
pub enum Task {
    /// Load the vote counts for this unit.
    Unit(WorkUnitRow),
    /// Identify which table this photo belongs to.
    Attachment(AttachmentRow),
}

/// Atomically claim the best queue entry for `worker`.
///
/// Entries for units or attachments the worker already submitted to are
/// skipped — a volunteer must never verify their own work. Entries in the
/// worker's affine circuit get a head start on the order key, keeping
/// workers inside a geography they have context for. Returns `None` when
/// the queue is empty, everything is excluded, or the queue lock is
/// contended.
pub fn claim_next<S: Store>(
    store: &S,
    settings: &EngineSettings,
    worker: SubmitterId,
    now: Timestamp,
) -> Result<Option<Task>, SchedulerError> {
    let mut exclude: Vec<TaskRef> = store
        .units_touched_by(worker)?
        .into_iter()
        .map(TaskRef::Unit)
        .collect();
    exclude.extend(
        store
            .attachments_touched_by(worker)?
            .into_iter()
            .map(TaskRef::Attachment),
    );
    let affinity = store.affine_circuit(worker)?;

    let Some(entry) = store.try_claim(&exclude, affinity, settings.affinity_bonus)? else {
        return Ok(None);
    };
    debug!(%worker, task = ?entry.task, order = entry.order, "claimed queue entry");

    if let Some(circuit) = entry.circuit {
        store.set_affine_circuit(worker, Some(circuit))?;
    }

    match entry.task {
        TaskRef::Unit(id) => {
            store.unit_assigned(id, now)?;
            refresh_unit_load_order(store, settings, id)?;
            Ok(Some(Task::Unit(store.get_unit(id)?)))
        }
        TaskRef::Attachment(id) => {
            store.attachment_assigned(id, now)?;
            Ok(Some(Task::Attachment(store.get_attachment(id)?)))
        }
    }
}
