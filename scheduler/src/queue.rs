//! Periodic queue rebuild.
//!
//! The rebuild tops the queue up to its target length from two candidate
//! pools — work units needing more vote-count submissions and attachments
//! needing more identifications — interleaving them by the configured
//! identification-vs-load coefficient. Entry order keys are monotonic, so
//! the interleave chosen here is exactly the order workers drain.

use crate::SchedulerError;
use recount_store::{NewQueueEntry, Store, TaskRef};
use recount_types::{CircuitId, EngineSettings};
use tracing::info;

struct Candidate {
    task: TaskRef,
    circuit: Option<CircuitId>,
    entries: usize,
}

/// Top the queue up to `max(active_sessions, min_queue_floor) ×
/// queue_growth_factor` entries. Returns how many entries were added.
pub fn rebuild_queue<S: Store>(
    store: &S,
    settings: &EngineSettings,
) -> Result<usize, SchedulerError> {
    let active = store.active_sessions()?;
    let target = (active.max(settings.min_queue_floor as u64) as f64
        * settings.queue_growth_factor)
        .floor() as usize;
    let current = store.queue_len()?;
    let needed = target.saturating_sub(current);
    if needed == 0 {
        return Ok(0);
    }

    let unit_pool = unit_candidates(store, settings)?;
    let attachment_pool = attachment_candidates(store, settings)?;

    let mut pending_unit_entries: usize = unit_pool.iter().map(|c| c.entries).sum();
    let mut pending_id_entries: usize = attachment_pool.iter().map(|c| c.entries).sum();

    let mut next_order = store
        .queue_entries()?
        .last()
        .map(|e| e.order + 1)
        .unwrap_or(0);
    let mut enqueued = 0usize;
    let mut units = unit_pool.into_iter();
    let mut attachments = attachment_pool.into_iter();
    let mut next_unit = units.next();
    let mut next_attachment = attachments.next();

    while enqueued < needed && (next_unit.is_some() || next_attachment.is_some()) {
        // Vote-count work is preferred while identification work is scarce
        // relative to it; otherwise keep feeding identifications so photos
        // keep turning into workable units.
        let prefer_unit = pending_id_entries == 0
            || (pending_id_entries as f64)
                < (pending_unit_entries as f64) * settings.id_vs_load_coefficient;

        let candidate = if prefer_unit && next_unit.is_some() {
            let c = next_unit.take();
            next_unit = units.next();
            c
        } else if next_attachment.is_some() {
            let c = next_attachment.take();
            next_attachment = attachments.next();
            c
        } else {
            let c = next_unit.take();
            next_unit = units.next();
            c
        };
        let Some(candidate) = candidate else { break };

        for _ in 0..candidate.entries {
            if enqueued >= needed {
                break;
            }
            store.enqueue(NewQueueEntry {
                order: next_order,
                task: candidate.task,
                circuit: candidate.circuit,
            })?;
            next_order += 1;
            enqueued += 1;
            match candidate.task {
                TaskRef::Unit(_) => pending_unit_entries -= 1,
                TaskRef::Attachment(_) => pending_id_entries -= 1,
            }
        }
    }

    info!(enqueued, target, "queue rebuilt");
    Ok(enqueued)
}

/// Units needing votes, best first, with how many entries each still needs.
fn unit_candidates<S: Store>(
    store: &S,
    settings: &EngineSettings,
) -> Result<Vec<Candidate>, SchedulerError> {
    let mut pool = Vec::new();
    for unit in store.pending_units()? {
        if unit.taken_at.is_some() {
            continue;
        }
        if store.queue_contains(TaskRef::Unit(unit.id))? {
            continue;
        }
        let entries = if unit.status.needs_single_vote() {
            1
        } else {
            settings.min_matching_submissions as usize
        };
        let category_priority = store.get_category(unit.category)?.priority;
        let circuit = store.get_table(unit.table)?.circuit;
        pool.push((unit, category_priority, entries, circuit));
    }
    pool.sort_by(|(a, ap, _, _), (b, bp, _, _)| {
        a.status
            .cmp(&b.status)
            .then(ap.cmp(bp))
            .then(
                a.load_order
                    .unwrap_or(f64::MAX)
                    .total_cmp(&b.load_order.unwrap_or(f64::MAX)),
            )
            .then(a.id.cmp(&b.id))
    });
    Ok(pool
        .into_iter()
        .map(|(unit, _, entries, circuit)| Candidate {
            task: TaskRef::Unit(unit.id),
            circuit: Some(circuit),
            entries,
        })
        .collect())
}

/// Attachments needing identifications, oldest first.
fn attachment_candidates<S: Store>(
    store: &S,
    settings: &EngineSettings,
) -> Result<Vec<Candidate>, SchedulerError> {
    let mut pool = Vec::new();
    for attachment in store.pending_attachments()? {
        if attachment.taken_at.is_some() {
            continue;
        }
        if store.queue_contains(TaskRef::Attachment(attachment.id))? {
            continue;
        }
        let live = store.live_identifications_for(attachment.id)?.len();
        let entries =
            (settings.min_matching_identifications as usize).saturating_sub(live);
        if entries == 0 {
            continue;
        }
        let circuit = match attachment.table {
            Some(table) => Some(store.get_table(table)?.circuit),
            None => None,
        };
        pool.push(Candidate {
            task: TaskRef::Attachment(attachment.id),
            circuit,
            entries,
        });
    }
    Ok(pool)
}
