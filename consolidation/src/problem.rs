//! Operator actions on problem reports.

use crate::ConsolidationError;
use recount_store::{ProblemScope, Store};
use recount_types::{EngineSettings, ProblemId, ProblemState, ScoringCause, SubmitterId, Timestamp};
use recount_trust::{apply_operator_penalty, EventContext};
use tracing::info;

/// An operator dismisses a reported problem; the reporter is penalized.
pub fn dismiss_problem<S: Store>(
    store: &S,
    settings: &EngineSettings,
    problem: ProblemId,
    actor: SubmitterId,
    now: Timestamp,
) -> Result<(), ConsolidationError> {
    let row = store.get_problem(problem)?;
    store.set_problem_state(problem, ProblemState::Resolved)?;
    if let Some(reporter) = row.reporter {
        apply_operator_penalty(
            store,
            settings,
            reporter,
            settings.problem_rejected_penalty,
            ScoringCause::ProblemRejected,
            actor,
            match row.scope {
                ProblemScope::Table(t) => EventContext::table(t),
                ProblemScope::Attachment(a) => EventContext::attachment(a),
            },
            now,
        )?;
        info!(%problem, %actor, %reporter, "problem dismissed; reporter penalized");
    }
    Ok(())
}
