//! The node: shared store + settings + the external interface.

use crate::{NodeError, SettingsHandle};
use recount_consolidation::{consume_novelties, DriverReport};
use recount_scheduler::{claim_next, rebuild_queue, release_expired_assignments, Task};
use recount_store::{
    CategoryRow, NewIdentification, NewProblem, NewSubmission, ProblemScope, Store, TableRow,
};
use recount_types::{
    AttachmentId, CategoryId, EngineSettings, IdentificationClaim, IdentificationId, ProblemId,
    ProblemKind, ProblemState, ReportedVotes, SubmissionId, SubmissionKind, SubmissionSource,
    SubmitterId, TableId, Timestamp, UnitStatus, WorkUnitId,
};
use recount_utils::StatsCounter;
use std::sync::Arc;
use tracing::debug;

/// Counter names tracked by every node.
const STAT_NAMES: &[&str] = &[
    "loads_submitted",
    "loads_dead_on_arrival",
    "identifications_submitted",
    "problems_reported",
    "tasks_claimed",
    "items_reconciled",
    "reconciliation_failures",
    "queue_entries_added",
    "assignments_released",
];

/// What a problem report is filed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemTarget {
    Unit(WorkUnitId),
    Attachment(AttachmentId),
}

/// A submitter's current standing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reputation {
    pub score: i64,
    pub untrusted: bool,
}

/// One running engine instance over a shared store.
pub struct Node<S> {
    store: Arc<S>,
    settings: SettingsHandle,
    stats: StatsCounter,
}

impl<S: Store> Node<S> {
    pub fn new(store: Arc<S>, settings: EngineSettings) -> Self {
        Self {
            store,
            settings: SettingsHandle::new(settings),
            stats: StatsCounter::new(STAT_NAMES),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    // ── Setup (run once by the import tooling) ──────────────────────────

    pub fn register_table(&self, row: TableRow) -> Result<(), NodeError> {
        Ok(self.store.insert_table(row)?)
    }

    pub fn register_category(&self, row: CategoryRow) -> Result<(), NodeError> {
        Ok(self.store.insert_category(row)?)
    }

    pub fn register_unit(
        &self,
        table: TableId,
        category: CategoryId,
    ) -> Result<WorkUnitId, NodeError> {
        Ok(self.store.insert_unit(table, category)?)
    }

    pub fn register_attachment(&self, now: Timestamp) -> Result<AttachmentId, NodeError> {
        Ok(self.store.insert_attachment(now)?)
    }

    /// The session count reported by the I/O layer; sizes the queue.
    pub fn report_active_sessions(&self, count: u64) -> Result<(), NodeError> {
        Ok(self.store.set_active_sessions(count)?)
    }

    // ── Inbound ─────────────────────────────────────────────────────────

    /// Record a vote-count submission.
    ///
    /// Submissions from an already-untrusted submitter are created dead on
    /// arrival: invalidated and pre-processed, so they never enter a voting
    /// pool and never wake the driver.
    pub fn submit_load(
        &self,
        unit: WorkUnitId,
        submitter: SubmitterId,
        kind: SubmissionKind,
        source: SubmissionSource,
        reported: ReportedVotes,
        now: Timestamp,
    ) -> Result<SubmissionId, NodeError> {
        // Reject unknown units up front so the driver never sees them.
        self.store.get_unit(unit)?;
        let dead = self.store.is_untrusted(submitter)?;
        let id = self.store.insert_submission(NewSubmission {
            unit,
            submitter,
            kind,
            source,
            reported,
            invalidated: dead,
            processed: dead,
            created_at: now,
        })?;
        if dead {
            self.stats.increment("loads_dead_on_arrival");
            debug!(%submitter, %unit, "load from untrusted submitter; dead on arrival");
        } else {
            self.stats.increment("loads_submitted");
        }
        // The submission ends the submitter's hold on the unit, if any.
        self.store.unit_released(unit)?;
        Ok(id)
    }

    /// Record a photo→table identification.
    pub fn submit_identification(
        &self,
        attachment: AttachmentId,
        submitter: SubmitterId,
        claim: IdentificationClaim,
        source: SubmissionSource,
        now: Timestamp,
    ) -> Result<IdentificationId, NodeError> {
        self.store.get_attachment(attachment)?;
        let dead = self.store.is_untrusted(submitter)?;
        let id = self.store.insert_identification(NewIdentification {
            attachment,
            submitter,
            claim,
            source,
            invalidated: dead,
            processed: dead,
            created_at: now,
        })?;
        if !dead {
            self.stats.increment("identifications_submitted");
        }
        self.store.attachment_released(attachment)?;
        Ok(id)
    }

    /// File a problem report against a unit or an attachment.
    ///
    /// Creates the pending problem record plus the matching submission row,
    /// so problem reports vote through the same consolidation thresholds as
    /// everything else.
    pub fn report_problem(
        &self,
        target: ProblemTarget,
        submitter: SubmitterId,
        kind: ProblemKind,
        description: Option<String>,
        now: Timestamp,
    ) -> Result<ProblemId, NodeError> {
        let scope = match target {
            ProblemTarget::Unit(unit) => {
                let row = self.store.get_unit(unit)?;
                self.submit_load(
                    unit,
                    submitter,
                    SubmissionKind::Problem,
                    SubmissionSource::Web,
                    ReportedVotes::default(),
                    now,
                )?;
                ProblemScope::Table(row.table)
            }
            ProblemTarget::Attachment(attachment) => {
                self.submit_identification(
                    attachment,
                    submitter,
                    IdentificationClaim::Problem(kind),
                    SubmissionSource::Web,
                    now,
                )?;
                ProblemScope::Attachment(attachment)
            }
        };
        let id = self.store.insert_problem(NewProblem {
            scope,
            kind,
            description,
            state: ProblemState::Reported,
            reporter: Some(submitter),
            at: now,
        })?;
        self.stats.increment("problems_reported");
        Ok(id)
    }

    // ── Outbound ────────────────────────────────────────────────────────

    /// Hand the worker their next task, if any.
    pub fn get_next_task(
        &self,
        worker: SubmitterId,
        now: Timestamp,
    ) -> Result<Option<Task>, NodeError> {
        let settings = self.settings.snapshot();
        let task = claim_next(self.store.as_ref(), &settings, worker, now)?;
        if task.is_some() {
            self.stats.increment("tasks_claimed");
        }
        Ok(task)
    }

    pub fn get_unit_status(
        &self,
        unit: WorkUnitId,
    ) -> Result<(UnitStatus, Option<SubmissionId>), NodeError> {
        let row = self.store.get_unit(unit)?;
        Ok((row.status, row.witness))
    }

    pub fn get_submitter_reputation(
        &self,
        submitter: SubmitterId,
    ) -> Result<Reputation, NodeError> {
        Ok(Reputation {
            score: self.store.reputation_score(submitter)?,
            untrusted: self.store.is_untrusted(submitter)?,
        })
    }

    // ── Operator actions ────────────────────────────────────────────────

    pub fn mark_submitter_untrusted(
        &self,
        submitter: SubmitterId,
        actor: SubmitterId,
        now: Timestamp,
    ) -> Result<(), NodeError> {
        Ok(recount_trust::mark_untrusted_explicit(
            self.store.as_ref(),
            submitter,
            actor,
            now,
        )?)
    }

    pub fn clear_submitter_untrusted(
        &self,
        submitter: SubmitterId,
        actor: SubmitterId,
        new_score: i64,
        now: Timestamp,
    ) -> Result<(), NodeError> {
        Ok(recount_trust::clear_untrusted(
            self.store.as_ref(),
            submitter,
            actor,
            new_score,
            now,
        )?)
    }

    pub fn dismiss_problem(
        &self,
        problem: ProblemId,
        actor: SubmitterId,
        now: Timestamp,
    ) -> Result<(), NodeError> {
        let settings = self.settings.snapshot();
        Ok(recount_consolidation::dismiss_problem(
            self.store.as_ref(),
            &settings,
            problem,
            actor,
            now,
        )?)
    }

    // ── Maintenance (driven by the background tasks) ────────────────────

    /// One batch reconciliation pass over all novelties.
    pub fn run_consolidation(&self, now: Timestamp) -> DriverReport {
        let settings = self.settings.snapshot();
        let report = consume_novelties(self.store.as_ref(), &settings, now);
        self.stats.add("items_reconciled", report.items as u64);
        self.stats
            .add("reconciliation_failures", report.failures as u64);
        report
    }

    /// Top the queue back up to its target length.
    pub fn run_scheduler(&self) -> Result<usize, NodeError> {
        let settings = self.settings.snapshot();
        let added = rebuild_queue(self.store.as_ref(), &settings)?;
        self.stats.add("queue_entries_added", added as u64);
        Ok(added)
    }

    /// Release assignments held past the timeout.
    pub fn run_timeout_sweep(&self, now: Timestamp) -> Result<usize, NodeError> {
        let settings = self.settings.snapshot();
        let released = release_expired_assignments(self.store.as_ref(), &settings, now)?;
        self.stats.add("assignments_released", released as u64);
        Ok(released)
    }
}
