//! Photo→table reconciliation.

use crate::ConsolidationError;
use recount_scheduler::refresh_units_for_table;
use recount_store::{IdentificationRow, NewProblem, ProblemScope, Store};
use recount_types::{
    AttachmentId, AttachmentStatus, EngineSettings, IdentificationClaim, IdentificationId,
    ProblemKind, ProblemState, ScoringCause, TableId, Timestamp,
};
use recount_trust::{apply_automatic_penalty, apply_automatic_reward, EventContext};
use std::collections::HashMap;
use tracing::{debug, info};

/// One table's identification votes.
struct TableGroup {
    table: TableId,
    members: Vec<IdentificationId>,
    csv: Option<IdentificationId>,
}

/// Derive which table (if any) the attachment shows and persist the result.
///
/// The first table group reaching the match threshold — or containing any
/// CSV identification — wins. An attachment that previously resolved to a
/// table and no longer does drags the units under that table with it: counts
/// loaded purely on the strength of this photo are invalidated and the units
/// re-reconcile without them.
pub fn reconcile_attachment<S: Store>(
    store: &S,
    settings: &EngineSettings,
    attachment_id: AttachmentId,
    now: Timestamp,
) -> Result<AttachmentStatus, ConsolidationError> {
    let previous = store.get_attachment(attachment_id)?;
    let live = store.live_identifications_for(attachment_id)?;

    let winner = winning_group(&live, settings.min_matching_identifications);

    let (status, table, witness) = match winner {
        Some(group) => {
            let witness = group.csv.unwrap_or(group.members[0]);
            (
                AttachmentStatus::Identified,
                Some(group.table),
                Some(witness),
            )
        }
        None => match confirmed_problem_kind(&live, settings.min_problem_identifications) {
            Some(kind) => {
                confirm_attachment_problem(store, attachment_id, kind, now)?;
                (AttachmentStatus::HasProblem, None, None)
            }
            None => (AttachmentStatus::Unidentified, None, None),
        },
    };

    store.set_attachment_resolution(attachment_id, status, table, witness)?;
    debug!(%attachment_id, ?status, ?table, "attachment reconciled");

    if let Some(resolved) = table {
        resolve_missing_sheet(store, resolved)?;
        apply_identification_scoring(store, settings, attachment_id, resolved, &live, now)?;
    }

    // De-association cascade: the photo stopped backing its old table.
    if let Some(old) = previous.table {
        if table != Some(old) {
            if store.attachments_for_table(old)?.is_empty() {
                invalidate_loads_for_table(store, old)?;
                info!(%attachment_id, table = %old, "table lost its last photo; loads invalidated");
            }
            refresh_units_for_table(store, settings, old)?;
        }
    }
    if let Some(resolved) = table {
        if previous.table != Some(resolved) {
            refresh_units_for_table(store, settings, resolved)?;
        }
    }

    Ok(status)
}

/// Group live table claims and pick the first group (by earliest member)
/// that reaches the threshold or carries a CSV identification.
fn winning_group(live: &[IdentificationRow], min_matching: u32) -> Option<TableGroup> {
    let mut groups: Vec<TableGroup> = Vec::new();
    let mut index: HashMap<TableId, usize> = HashMap::new();

    for row in live {
        let Some(table) = row.claim.table() else {
            continue;
        };
        let i = *index.entry(table).or_insert_with(|| {
            groups.push(TableGroup {
                table,
                members: Vec::new(),
                csv: None,
            });
            groups.len() - 1
        });
        groups[i].members.push(row.id);
        if row.source.is_csv() && groups[i].csv.is_none() {
            groups[i].csv = Some(row.id);
        }
    }

    groups
        .into_iter()
        .find(|g| g.members.len() >= min_matching as usize || g.csv.is_some())
}

/// A problem kind reported by enough identifiers, if any.
fn confirmed_problem_kind(
    live: &[IdentificationRow],
    min_problem: u32,
) -> Option<ProblemKind> {
    let mut counts: HashMap<ProblemKind, usize> = HashMap::new();
    for row in live {
        if let IdentificationClaim::Problem(kind) = row.claim {
            *counts.entry(kind).or_insert(0) += 1;
        }
    }
    let mut confirmed: Vec<ProblemKind> = counts
        .into_iter()
        .filter(|(_, n)| *n >= min_problem as usize)
        .map(|(k, _)| k)
        .collect();
    confirmed.sort();
    confirmed.into_iter().next()
}

/// Reputation effects of a confirmed identification.
fn apply_identification_scoring<S: Store>(
    store: &S,
    settings: &EngineSettings,
    attachment_id: AttachmentId,
    table: TableId,
    live: &[IdentificationRow],
    now: Timestamp,
) -> Result<(), ConsolidationError> {
    for row in live {
        if row.claim.table() == Some(table) {
            apply_automatic_reward(
                store,
                row.submitter,
                settings.confirmed_identification_reward,
                ScoringCause::ConfirmedIdentification,
                EventContext::attachment(attachment_id),
                now,
            )?;
        } else {
            apply_automatic_penalty(
                store,
                settings,
                row.submitter,
                settings.divergent_identification_penalty,
                ScoringCause::DivergentIdentification,
                EventContext::attachment(attachment_id),
                now,
            )?;
        }
    }
    Ok(())
}

/// A consolidated photo proves the table's sheet exists.
fn resolve_missing_sheet<S: Store>(store: &S, table: TableId) -> Result<(), ConsolidationError> {
    for state in [ProblemState::Reported, ProblemState::Confirmed] {
        for problem in store.problems_for(ProblemScope::Table(table), state)? {
            if problem.kind == ProblemKind::MissingSheet {
                store.set_problem_state(problem.id, ProblemState::Resolved)?;
            }
        }
    }
    Ok(())
}

/// Confirm the attachment's reported problems of the winning kind, creating
/// the record if the reports only came in as identification claims.
fn confirm_attachment_problem<S: Store>(
    store: &S,
    attachment_id: AttachmentId,
    kind: ProblemKind,
    now: Timestamp,
) -> Result<(), ConsolidationError> {
    let scope = ProblemScope::Attachment(attachment_id);
    let reported = store.problems_for(scope, ProblemState::Reported)?;
    let mut confirmed_any = false;
    for problem in reported {
        if problem.kind == kind {
            store.set_problem_state(problem.id, ProblemState::Confirmed)?;
            confirmed_any = true;
        }
    }
    if !confirmed_any && store.problems_for(scope, ProblemState::Confirmed)?.is_empty() {
        store.insert_problem(NewProblem {
            scope,
            kind,
            description: None,
            state: ProblemState::Confirmed,
            reporter: None,
            at: now,
        })?;
    }
    Ok(())
}

/// Retire every live load submission under a table.
fn invalidate_loads_for_table<S: Store>(store: &S, table: TableId) -> Result<(), ConsolidationError> {
    for unit in store.units_for_table(table)? {
        for submission in store.live_submissions_for_unit(unit.id)? {
            store.invalidate_submission(submission.id)?;
        }
    }
    Ok(())
}
