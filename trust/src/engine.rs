//! Scoring operations and the untrusted cascade.

use crate::TrustError;
use recount_store::{NewReputationEvent, NewTrustChange, Store};
use recount_types::{
    AttachmentId, EngineSettings, ReputationEventId, ScoringCause, SubmitterId, TableId,
    Timestamp, WorkUnitId,
};
use tracing::{debug, info};

/// What a ledger entry refers back to.
#[derive(Clone, Copy, Debug, Default)]
pub struct EventContext {
    pub unit: Option<WorkUnitId>,
    pub attachment: Option<AttachmentId>,
    pub table: Option<TableId>,
}

impl EventContext {
    pub fn unit(unit: WorkUnitId) -> Self {
        Self {
            unit: Some(unit),
            ..Self::default()
        }
    }

    pub fn attachment(attachment: AttachmentId) -> Self {
        Self {
            attachment: Some(attachment),
            ..Self::default()
        }
    }

    pub fn table(table: TableId) -> Self {
        Self {
            table: Some(table),
            ..Self::default()
        }
    }
}

/// Append a positive (penalizing) automatic entry and flip the submitter to
/// untrusted if their new score reaches the threshold.
pub fn apply_automatic_penalty<S: Store>(
    store: &S,
    settings: &EngineSettings,
    submitter: SubmitterId,
    amount: i64,
    cause: ScoringCause,
    ctx: EventContext,
    now: Timestamp,
) -> Result<ReputationEventId, TrustError> {
    let event = store.append_reputation_event(NewReputationEvent {
        submitter,
        delta: amount,
        cause,
        automatic: true,
        actor: None,
        unit: ctx.unit,
        attachment: ctx.attachment,
        table: ctx.table,
        at: now,
    })?;
    debug!(%submitter, %cause, amount, "reputation penalty");

    let was_untrusted = store.is_untrusted(submitter)?;
    if !was_untrusted && store.reputation_score(submitter)? >= settings.untrusted_threshold {
        mark_untrusted(store, submitter, event, true, None, now)?;
    }
    Ok(event)
}

/// Append a negative (rewarding) automatic entry. Rewards never flip the
/// untrusted flag in either direction — only an operator clears it.
pub fn apply_automatic_reward<S: Store>(
    store: &S,
    submitter: SubmitterId,
    amount: i64,
    cause: ScoringCause,
    ctx: EventContext,
    now: Timestamp,
) -> Result<ReputationEventId, TrustError> {
    let event = store.append_reputation_event(NewReputationEvent {
        submitter,
        delta: -amount,
        cause,
        automatic: true,
        actor: None,
        unit: ctx.unit,
        attachment: ctx.attachment,
        table: ctx.table,
        at: now,
    })?;
    debug!(%submitter, %cause, amount, "reputation reward");
    Ok(event)
}

/// Append an operator-issued penalizing entry (e.g. a dismissed problem
/// report) and flip the submitter if the threshold is reached.
pub fn apply_operator_penalty<S: Store>(
    store: &S,
    settings: &EngineSettings,
    submitter: SubmitterId,
    amount: i64,
    cause: ScoringCause,
    actor: SubmitterId,
    ctx: EventContext,
    now: Timestamp,
) -> Result<ReputationEventId, TrustError> {
    let event = store.append_reputation_event(NewReputationEvent {
        submitter,
        delta: amount,
        cause,
        automatic: false,
        actor: Some(actor),
        unit: ctx.unit,
        attachment: ctx.attachment,
        table: ctx.table,
        at: now,
    })?;
    debug!(%submitter, %cause, amount, %actor, "operator reputation penalty");

    let was_untrusted = store.is_untrusted(submitter)?;
    if !was_untrusted && store.reputation_score(submitter)? >= settings.untrusted_threshold {
        mark_untrusted(store, submitter, event, false, Some(actor), now)?;
    }
    Ok(event)
}

/// An operator decides a submitter is untrusted regardless of score.
pub fn mark_untrusted_explicit<S: Store>(
    store: &S,
    submitter: SubmitterId,
    actor: SubmitterId,
    now: Timestamp,
) -> Result<(), TrustError> {
    let event = store.append_reputation_event(NewReputationEvent {
        submitter,
        delta: 0,
        cause: ScoringCause::ExplicitMark,
        automatic: false,
        actor: Some(actor),
        unit: None,
        attachment: None,
        table: None,
        at: now,
    })?;
    mark_untrusted(store, submitter, event, false, Some(actor), now)
}

/// An operator clears the untrusted mark and sets the submitter's score to
/// `new_score`. The ledger entry delta is derived so score stays the sum of
/// deltas.
pub fn clear_untrusted<S: Store>(
    store: &S,
    submitter: SubmitterId,
    actor: SubmitterId,
    new_score: i64,
    now: Timestamp,
) -> Result<(), TrustError> {
    let delta = new_score - store.reputation_score(submitter)?;
    let event = store.append_reputation_event(NewReputationEvent {
        submitter,
        delta,
        cause: ScoringCause::MarkRemoval,
        automatic: false,
        actor: Some(actor),
        unit: None,
        attachment: None,
        table: None,
        at: now,
    })?;
    store.append_trust_change(NewTrustChange {
        submitter,
        untrusted: false,
        automatic: false,
        actor: Some(actor),
        trigger: event,
        at: now,
    })?;
    store.set_untrusted(submitter, false)?;
    info!(%submitter, %actor, new_score, "untrusted mark cleared");
    Ok(())
}

/// Flip a submitter to untrusted and run the invalidation cascade.
fn mark_untrusted<S: Store>(
    store: &S,
    submitter: SubmitterId,
    trigger: ReputationEventId,
    automatic: bool,
    actor: Option<SubmitterId>,
    now: Timestamp,
) -> Result<(), TrustError> {
    store.append_trust_change(NewTrustChange {
        submitter,
        untrusted: true,
        automatic,
        actor,
        trigger,
        at: now,
    })?;
    store.set_untrusted(submitter, true)?;
    let (loads, identifications) = cascade_invalidate(store, submitter)?;
    info!(
        %submitter,
        automatic,
        invalidated_loads = loads,
        invalidated_identifications = identifications,
        "submitter marked untrusted"
    );
    Ok(())
}

/// Invalidate every live submission by the given submitter.
///
/// Each row flips to `invalidated = true, processed = false`, so the next
/// driver run re-reconciles every affected unit and attachment without the
/// retired data. Returns how many loads and identifications were retired.
pub fn cascade_invalidate<S: Store>(
    store: &S,
    submitter: SubmitterId,
) -> Result<(usize, usize), TrustError> {
    let loads = store.live_submissions_by(submitter)?;
    for row in &loads {
        store.invalidate_submission(row.id)?;
    }
    let identifications = store.live_identifications_by(submitter)?;
    for row in &identifications {
        store.invalidate_identification(row.id)?;
    }
    Ok((loads.len(), identifications.len()))
}
