//! Releasing assignments held past the timeout.

use crate::load_order::refresh_unit_load_order;
use crate::SchedulerError;
use recount_store::Store;
use recount_types::{EngineSettings, Timestamp};
use tracing::info;

/// Release every unit and attachment assignment older than the configured
/// timeout. The worker keeps whatever they were typing — only the "currently
/// assigned" count drops, so the unit becomes claimable by someone else.
///
/// Both sweeps are non-blocking; a concurrently running sweep or heavy claim
/// traffic just means nothing is released this round.
pub fn release_expired_assignments<S: Store>(
    store: &S,
    settings: &EngineSettings,
    now: Timestamp,
) -> Result<usize, SchedulerError> {
    let units = store.try_release_expired_units(settings.assignment_timeout_secs, now)?;
    for unit in &units {
        refresh_unit_load_order(store, settings, *unit)?;
    }
    let attachments =
        store.try_release_expired_attachments(settings.assignment_timeout_secs, now)?;

    let released = units.len() + attachments.len();
    if released > 0 {
        info!(
            units = units.len(),
            attachments = attachments.len(),
            "released expired assignments"
        );
    }
    Ok(released)
}
