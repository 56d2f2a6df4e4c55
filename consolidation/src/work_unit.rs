//! Vote-count reconciliation for one work unit.

use crate::tally::tally_votes;
use crate::{ConsolidationError, TallyOutcome, Tier};
use recount_store::{ProblemScope, Store, SubmissionRow};
use recount_types::{
    EngineSettings, ProblemState, ScoringCause, SubmissionId, SubmissionKind, TableId, Timestamp,
    UnitStatus, WorkUnitId,
};
use recount_trust::{
    apply_automatic_penalty, apply_automatic_reward, vote_divergence, EventContext, TrustError,
};
use tracing::{debug, warn};

/// Derive the unit's status and witness from its live submissions and
/// persist them.
///
/// Partial submissions vote first. The full tier only runs when the partial
/// outcome left room for it (empty, or confirmed either way); a partial
/// conflict or lone unconfirmed partial blocks full counting until it is
/// resolved. A full-tier result always overrides the partial one.
pub fn reconcile_work_unit<S: Store>(
    store: &S,
    settings: &EngineSettings,
    unit_id: WorkUnitId,
    now: Timestamp,
) -> Result<UnitStatus, ConsolidationError> {
    let unit = store.get_unit(unit_id)?;
    let live = store.live_submissions_for_unit(unit_id)?;

    if live.is_empty() {
        store.set_unit_status(unit_id, UnitStatus::Empty, None)?;
        return Ok(UnitStatus::Empty);
    }

    let problems: Vec<&SubmissionRow> = live
        .iter()
        .filter(|s| s.kind == SubmissionKind::Problem)
        .collect();
    if problems.len() >= settings.min_problem_matches as usize {
        confirm_table_problems(store, unit.table)?;
        store.set_unit_status(unit_id, UnitStatus::HasProblem, None)?;
        debug!(%unit_id, reports = problems.len(), "problem confirmed for unit");
        return Ok(UnitStatus::HasProblem);
    }

    // Recompute every counted signature before voting.
    let mut counted: Vec<SubmissionRow> = live
        .iter()
        .filter(|s| s.kind != SubmissionKind::Problem)
        .cloned()
        .collect();
    for row in &mut counted {
        let signature = row.reported.signature();
        store.set_submission_signature(row.id, signature.clone())?;
        row.signature = Some(signature);
    }

    let partial: Vec<SubmissionRow> = counted
        .iter()
        .filter(|s| s.kind == SubmissionKind::Partial)
        .cloned()
        .collect();
    let full: Vec<SubmissionRow> = counted
        .iter()
        .filter(|s| s.kind == SubmissionKind::Full)
        .cloned()
        .collect();

    let mut tier = Tier::Partial;
    let mut outcome = tally_votes(&partial, settings.min_matching_submissions);
    if outcome.allows_full_tier() && !full.is_empty() {
        tier = Tier::Full;
        outcome = tally_votes(&full, settings.min_matching_submissions);
    }

    let status = outcome.status_for(tier);
    store.set_unit_status(unit_id, status, outcome.witness())?;
    debug!(%unit_id, %status, "unit reconciled");

    if let TallyOutcome::ConfirmedDouble(witness_id) = outcome {
        let tier_rows = match tier {
            Tier::Partial => &partial,
            Tier::Full => &full,
        };
        apply_confirmation_scoring(store, settings, unit_id, witness_id, tier_rows, &problems, now)?;
    }

    Ok(status)
}

/// Reputation effects of a duplicate-confirmed count: matching submitters
/// are rewarded, divergent ones penalized, and anyone who claimed "problem"
/// on a unit that turned out countable is penalized too.
fn apply_confirmation_scoring<S: Store>(
    store: &S,
    settings: &EngineSettings,
    unit_id: WorkUnitId,
    witness_id: SubmissionId,
    tier_rows: &[SubmissionRow],
    problems: &[&SubmissionRow],
    now: Timestamp,
) -> Result<(), ConsolidationError> {
    let Some(witness) = tier_rows.iter().find(|s| s.id == witness_id) else {
        return Ok(());
    };

    for row in tier_rows {
        if row.id == witness.id {
            apply_automatic_reward(
                store,
                row.submitter,
                settings.confirmed_load_reward,
                ScoringCause::ConfirmedLoad,
                EventContext::unit(unit_id),
                now,
            )?;
            continue;
        }
        match vote_divergence(row, witness) {
            Ok(0) => {
                apply_automatic_reward(
                    store,
                    row.submitter,
                    settings.confirmed_load_reward,
                    ScoringCause::ConfirmedLoad,
                    EventContext::unit(unit_id),
                    now,
                )?;
            }
            Ok(_) => {
                apply_automatic_penalty(
                    store,
                    settings,
                    row.submitter,
                    settings.divergent_load_penalty,
                    ScoringCause::DivergentLoad,
                    EventContext::unit(unit_id),
                    now,
                )?;
            }
            Err(TrustError::Incomparable(reason)) => {
                // Not a zero diff; no score effect either way.
                warn!(%unit_id, submission = %row.id, %reason, "incomparable submissions");
            }
            Err(e) => return Err(e.into()),
        }
    }

    for row in problems {
        apply_automatic_penalty(
            store,
            settings,
            row.submitter,
            settings.problem_on_confirmed_penalty,
            ScoringCause::ProblemOnConfirmedUnit,
            EventContext::unit(unit_id),
            now,
        )?;
    }
    Ok(())
}

/// Flip the table's reported problems to confirmed.
fn confirm_table_problems<S: Store>(
    store: &S,
    table: TableId,
) -> Result<(), ConsolidationError> {
    for problem in store.problems_for(ProblemScope::Table(table), ProblemState::Reported)? {
        store.set_problem_state(problem.id, ProblemState::Confirmed)?;
    }
    Ok(())
}
