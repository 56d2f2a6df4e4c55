//! Integration tests exercising the full pipeline:
//! submissions → consolidation → trust scoring → scheduling → claims.
//!
//! These tests wire together components that are normally only connected
//! inside the background tasks, verifying the system works end-to-end — not
//! just in isolation.

use recount_node::{Node, ProblemTarget};
use recount_scheduler::Task;
use recount_store::{
    AttachmentStore, CategoryRow, ProblemScope, ProblemStore, QueueStore, SubmissionStore,
    TableRow, WorkUnitStore,
};
use recount_store_memory::MemoryStore;
use recount_types::{
    AttachmentId, AttachmentStatus, CategoryId, CircuitId, EngineSettings, IdentificationClaim,
    OptionId, ProblemKind, ProblemState, ReportedVotes, SectionId, SubmissionKind,
    SubmissionSource, SubmitterId, TableId, Timestamp, UnitStatus, VoteEntry, WorkUnitId,
};
use std::sync::Arc;

fn test_settings() -> EngineSettings {
    let mut s = EngineSettings::standard();
    s.min_matching_submissions = 2;
    s.min_matching_identifications = 2;
    s.min_problem_matches = 2;
    s.min_queue_floor = 10;
    s.queue_growth_factor = 2.0;
    // Drain-order assertions need raw enqueue order.
    s.affinity_bonus = 0;
    s
}

fn make_node() -> Node<MemoryStore> {
    Node::new(Arc::new(MemoryStore::new()), test_settings())
}

fn ts(secs: u64) -> Timestamp {
    Timestamp::new(secs)
}

fn votes(pairs: &[(u32, u32)]) -> ReportedVotes {
    ReportedVotes::new(
        pairs
            .iter()
            .map(|(o, v)| VoteEntry {
                option: OptionId::new(*o),
                votes: Some(*v),
            })
            .collect(),
    )
}

fn seed_table(node: &Node<MemoryStore>, table: u32, circuit: u32) {
    node.register_table(TableRow {
        id: TableId::new(table),
        circuit: CircuitId::new(circuit),
        section: SectionId::new(1),
    })
    .unwrap();
}

fn seed_category(node: &Node<MemoryStore>, category: u32) {
    node.register_category(CategoryRow {
        id: CategoryId::new(category),
        priority: 0,
    })
    .unwrap();
}

fn submit_full(
    node: &Node<MemoryStore>,
    unit: WorkUnitId,
    submitter: u64,
    source: SubmissionSource,
    pairs: &[(u32, u32)],
) {
    node.submit_load(
        unit,
        SubmitterId::new(submitter),
        SubmissionKind::Full,
        source,
        votes(pairs),
        ts(10),
    )
    .unwrap();
}

// ── Consolidation scenarios ─────────────────────────────────────────────

#[test]
fn three_matching_full_counts_confirm_by_duplication() {
    let node = make_node();
    seed_table(&node, 1, 1);
    seed_category(&node, 1);
    let unit = node
        .register_unit(TableId::new(1), CategoryId::new(1))
        .unwrap();

    for submitter in 1..=3 {
        submit_full(&node, unit, submitter, SubmissionSource::Web, &[(1, 10), (2, 20)]);
    }
    node.run_consolidation(ts(20));

    let (status, witness) = node.get_unit_status(unit).unwrap();
    assert_eq!(status, UnitStatus::FullConfirmedDouble);
    let witness = node.store().get_submission(witness.unwrap()).unwrap();
    assert_eq!(witness.signature.unwrap().as_str(), "1-10|2-20");
}

#[test]
fn csv_submission_beats_a_divergent_web_one() {
    let node = make_node();
    seed_table(&node, 1, 1);
    seed_category(&node, 1);
    let unit = node
        .register_unit(TableId::new(1), CategoryId::new(1))
        .unwrap();

    submit_full(&node, unit, 1, SubmissionSource::Csv, &[(1, 10)]);
    submit_full(&node, unit, 2, SubmissionSource::Web, &[(1, 9)]);
    node.run_consolidation(ts(20));

    let (status, witness) = node.get_unit_status(unit).unwrap();
    assert_eq!(status, UnitStatus::FullConfirmedCsv);
    let witness = node.store().get_submission(witness.unwrap()).unwrap();
    assert!(witness.source.is_csv());
}

#[test]
fn consolidation_driver_is_idempotent() {
    let node = make_node();
    seed_table(&node, 1, 1);
    seed_category(&node, 1);
    let unit = node
        .register_unit(TableId::new(1), CategoryId::new(1))
        .unwrap();
    submit_full(&node, unit, 1, SubmissionSource::Web, &[(1, 10)]);
    submit_full(&node, unit, 2, SubmissionSource::Web, &[(1, 10)]);

    let first = node.run_consolidation(ts(20));
    assert_eq!(first.rows_processed, 2);
    let before = node.get_unit_status(unit).unwrap();

    let second = node.run_consolidation(ts(21));
    assert_eq!(second.items, 0);
    assert_eq!(second.rows_processed, 0);
    assert_eq!(node.get_unit_status(unit).unwrap(), before);
}

#[test]
fn matching_problem_reports_flag_the_unit() {
    let node = make_node();
    seed_table(&node, 1, 1);
    seed_category(&node, 1);
    let unit = node
        .register_unit(TableId::new(1), CategoryId::new(1))
        .unwrap();

    node.report_problem(
        ProblemTarget::Unit(unit),
        SubmitterId::new(1),
        ProblemKind::IllegibleSheet,
        Some("smudged".into()),
        ts(10),
    )
    .unwrap();
    node.report_problem(
        ProblemTarget::Unit(unit),
        SubmitterId::new(2),
        ProblemKind::IllegibleSheet,
        None,
        ts(11),
    )
    .unwrap();
    node.run_consolidation(ts(20));

    let (status, witness) = node.get_unit_status(unit).unwrap();
    assert_eq!(status, UnitStatus::HasProblem);
    assert!(witness.is_none());
    assert!(!node
        .store()
        .problems_for(ProblemScope::Table(TableId::new(1)), ProblemState::Confirmed)
        .unwrap()
        .is_empty());
}

// ── Trust scenarios ─────────────────────────────────────────────────────

#[test]
fn repeated_divergence_flips_the_submitter_and_invalidates_their_rows() {
    let node = make_node();
    seed_category(&node, 1);
    for t in 1..=3 {
        seed_table(&node, t, 1);
    }
    let unit_a = node
        .register_unit(TableId::new(1), CategoryId::new(1))
        .unwrap();
    let unit_b = node
        .register_unit(TableId::new(2), CategoryId::new(1))
        .unwrap();
    let unit_c = node
        .register_unit(TableId::new(3), CategoryId::new(1))
        .unwrap();

    let mut settings = test_settings();
    settings.untrusted_threshold = 150;
    settings.divergent_load_penalty = 100;
    node.settings().replace(settings).unwrap();

    let troll = 66u64;
    // A live row elsewhere that the cascade must also retire.
    submit_full(&node, unit_c, troll, SubmissionSource::Web, &[(1, 1)]);

    // Two confirmed units the troll diverged on: 100 + 100 crosses 150.
    submit_full(&node, unit_a, 1, SubmissionSource::Web, &[(1, 10)]);
    submit_full(&node, unit_a, 2, SubmissionSource::Web, &[(1, 10)]);
    submit_full(&node, unit_a, troll, SubmissionSource::Web, &[(1, 5)]);
    submit_full(&node, unit_b, 3, SubmissionSource::Web, &[(1, 20)]);
    submit_full(&node, unit_b, 4, SubmissionSource::Web, &[(1, 20)]);
    submit_full(&node, unit_b, troll, SubmissionSource::Web, &[(1, 5)]);
    node.run_consolidation(ts(20));

    let reputation = node.get_submitter_reputation(SubmitterId::new(troll)).unwrap();
    assert!(reputation.untrusted);
    assert!(reputation.score >= 150);

    // All and only the troll's rows were invalidated and re-queued.
    assert!(node
        .store()
        .live_submissions_by(SubmitterId::new(troll))
        .unwrap()
        .is_empty());
    assert_eq!(
        node.store()
            .live_submissions_by(SubmitterId::new(1))
            .unwrap()
            .len(),
        1
    );

    // Submissions made after the flip are born dead.
    let late = node
        .submit_load(
            unit_c,
            SubmitterId::new(troll),
            SubmissionKind::Full,
            SubmissionSource::Web,
            votes(&[(1, 3)]),
            ts(30),
        )
        .unwrap();
    let row = node.store().get_submission(late).unwrap();
    assert!(row.invalidated);
    assert!(row.processed);
}

#[test]
fn cascade_can_only_demote_a_units_status() {
    let node = make_node();
    seed_table(&node, 1, 1);
    seed_category(&node, 1);
    let unit = node
        .register_unit(TableId::new(1), CategoryId::new(1))
        .unwrap();

    let troll = 9u64;
    submit_full(&node, unit, 1, SubmissionSource::Web, &[(1, 10)]);
    submit_full(&node, unit, troll, SubmissionSource::Web, &[(1, 10)]);
    node.run_consolidation(ts(20));
    assert_eq!(
        node.get_unit_status(unit).unwrap().0,
        UnitStatus::FullConfirmedDouble
    );

    node.mark_submitter_untrusted(SubmitterId::new(troll), SubmitterId::new(999), ts(30))
        .unwrap();
    node.run_consolidation(ts(31));

    // One live submission left: the unit demotes, it never re-confirms out
    // of invalidated data.
    let (status, witness) = node.get_unit_status(unit).unwrap();
    assert_eq!(status, UnitStatus::FullUnconfirmed);
    let witness = node.store().get_submission(witness.unwrap()).unwrap();
    assert_eq!(witness.submitter, SubmitterId::new(1));

    let rerun = node.run_consolidation(ts(32));
    assert_eq!(rerun.items, 0);
    assert_eq!(
        node.get_unit_status(unit).unwrap().0,
        UnitStatus::FullUnconfirmed
    );
}

#[test]
fn cleared_submitter_votes_again() {
    let node = make_node();
    seed_table(&node, 1, 1);
    seed_category(&node, 1);
    let unit = node
        .register_unit(TableId::new(1), CategoryId::new(1))
        .unwrap();

    let submitter = SubmitterId::new(5);
    node.mark_submitter_untrusted(submitter, SubmitterId::new(999), ts(10))
        .unwrap();
    node.clear_submitter_untrusted(submitter, SubmitterId::new(999), 0, ts(20))
        .unwrap();

    let id = node
        .submit_load(
            unit,
            submitter,
            SubmissionKind::Full,
            SubmissionSource::Web,
            votes(&[(1, 10)]),
            ts(30),
        )
        .unwrap();
    let row = node.store().get_submission(id).unwrap();
    assert!(!row.invalidated);
    let reputation = node.get_submitter_reputation(submitter).unwrap();
    assert!(!reputation.untrusted);
    assert_eq!(reputation.score, 0);
}

// ── Scheduler scenarios (ported from the production queue behavior) ─────

/// Build the two-table, three-unit, five-loose-photos fixture.
fn scheduler_fixture(node: &Node<MemoryStore>) -> (Vec<AttachmentId>, AttachmentId, AttachmentId) {
    seed_category(node, 1);
    seed_category(node, 2);
    seed_table(node, 1, 1);
    seed_table(node, 2, 1);
    node.register_unit(TableId::new(1), CategoryId::new(1))
        .unwrap();
    node.register_unit(TableId::new(2), CategoryId::new(1))
        .unwrap();
    node.register_unit(TableId::new(2), CategoryId::new(2))
        .unwrap();

    let loose: Vec<AttachmentId> = (0..5)
        .map(|_| node.register_attachment(ts(1)).unwrap())
        .collect();
    let att_m1 = node.register_attachment(ts(2)).unwrap();
    let att_m2 = node.register_attachment(ts(2)).unwrap();
    (loose, att_m1, att_m2)
}

#[test]
fn rebuild_counts_follow_identification_progress() {
    let node = make_node();
    let (_loose, att_m1, att_m2) = scheduler_fixture(&node);

    // One interactive identification for table 1, one CSV for table 2.
    node.submit_identification(
        att_m1,
        SubmitterId::new(100),
        IdentificationClaim::Table(TableId::new(1)),
        SubmissionSource::Web,
        ts(5),
    )
    .unwrap();
    node.submit_identification(
        att_m2,
        SubmitterId::new(101),
        IdentificationClaim::Table(TableId::new(2)),
        SubmissionSource::Csv,
        ts(5),
    )
    .unwrap();

    assert_eq!(node.store().queue_len().unwrap(), 0);

    // Before consolidation only identification work exists: two entries per
    // loose photo, one more for each photo that already has a vote.
    node.run_scheduler().unwrap();
    assert_eq!(node.store().queue_len().unwrap(), 12);

    // Consuming novelties consolidates table 2 via CSV, unlocking its two
    // units (four load entries).
    node.run_consolidation(ts(6));
    node.run_scheduler().unwrap();
    assert_eq!(node.store().queue_len().unwrap(), 16);
    let first = node.store().queue_entries().unwrap();

    // No novelties: another pass leaves the queue exactly as it was.
    node.run_consolidation(ts(7));
    node.run_scheduler().unwrap();
    assert_eq!(node.store().queue_entries().unwrap(), first);
}

/// Drain the queue, recording task kinds (true = identification).
fn drain_kinds(node: &Node<MemoryStore>, n: usize) -> Vec<bool> {
    let worker = SubmitterId::new(888);
    let mut kinds = Vec::new();
    for _ in 0..n {
        match node.get_next_task(worker, ts(50)).unwrap() {
            Some(Task::Attachment(_)) => kinds.push(true),
            Some(Task::Unit(_)) => kinds.push(false),
            None => break,
        }
    }
    kinds
}

#[test]
fn high_coefficient_hands_out_loads_first() {
    let node = make_node();
    let (_loose, att_m1, att_m2) = scheduler_fixture(&node);
    node.submit_identification(
        att_m1,
        SubmitterId::new(100),
        IdentificationClaim::Table(TableId::new(1)),
        SubmissionSource::Csv,
        ts(5),
    )
    .unwrap();
    node.submit_identification(
        att_m2,
        SubmitterId::new(101),
        IdentificationClaim::Table(TableId::new(2)),
        SubmissionSource::Csv,
        ts(5),
    )
    .unwrap();
    node.run_consolidation(ts(6));

    let mut settings = test_settings();
    settings.id_vs_load_coefficient = 10.0;
    node.settings().replace(settings).unwrap();
    node.run_scheduler().unwrap();
    assert_eq!(node.store().queue_len().unwrap(), 16);

    let kinds = drain_kinds(&node, 16);
    assert_eq!(kinds[..6].to_vec(), vec![false; 6]);
    assert_eq!(kinds[6..].to_vec(), vec![true; 10]);

    // Nothing left to hand out.
    assert!(node.get_next_task(SubmitterId::new(888), ts(60)).unwrap().is_none());
}

#[test]
fn low_coefficient_interleaves_identifications_and_loads() {
    let node = make_node();
    let (_loose, att_m1, att_m2) = scheduler_fixture(&node);
    node.submit_identification(
        att_m1,
        SubmitterId::new(100),
        IdentificationClaim::Table(TableId::new(1)),
        SubmissionSource::Csv,
        ts(5),
    )
    .unwrap();
    node.submit_identification(
        att_m2,
        SubmitterId::new(101),
        IdentificationClaim::Table(TableId::new(2)),
        SubmissionSource::Csv,
        ts(5),
    )
    .unwrap();
    node.run_consolidation(ts(6));

    let mut settings = test_settings();
    settings.id_vs_load_coefficient = 1.0;
    node.settings().replace(settings).unwrap();
    node.run_scheduler().unwrap();
    assert_eq!(node.store().queue_len().unwrap(), 16);

    let kinds = drain_kinds(&node, 16);
    let expected = [
        true, true, true, true, true, true,
        false, false,
        true, true, false, false,
        true, true, false, false,
    ];
    assert_eq!(kinds, expected);
    assert!(node.get_next_task(SubmitterId::new(888), ts(60)).unwrap().is_none());
}

#[test]
fn affinity_keeps_a_worker_in_their_circuit() {
    use recount_store::{NewQueueEntry, TaskRef};

    let node = make_node();
    seed_category(&node, 1);
    seed_table(&node, 1, 1);
    seed_table(&node, 2, 2);
    let near = node
        .register_unit(TableId::new(1), CategoryId::new(1))
        .unwrap();
    let far = node
        .register_unit(TableId::new(2), CategoryId::new(1))
        .unwrap();
    node.store().set_load_order(near, Some(1.0)).unwrap();
    node.store().set_load_order(far, Some(1.0)).unwrap();

    let mut settings = test_settings();
    settings.affinity_bonus = 10;
    node.settings().replace(settings).unwrap();

    // Interleave the two circuits by raw order.
    for (order, unit, circuit) in [(0, near, 1), (1, far, 2), (2, near, 1)] {
        node.store()
            .enqueue(NewQueueEntry {
                order,
                task: TaskRef::Unit(unit),
                circuit: Some(CircuitId::new(circuit)),
            })
            .unwrap();
    }

    let worker = SubmitterId::new(7);
    // First claim takes the lowest order and pins affinity to circuit 1.
    let Some(Task::Unit(first)) = node.get_next_task(worker, ts(10)).unwrap() else {
        panic!("expected a unit task");
    };
    assert_eq!(first.id, near);

    // The next entry by raw order belongs to circuit 2, but the bonus keeps
    // the worker in circuit 1.
    let Some(Task::Unit(second)) = node.get_next_task(worker, ts(11)).unwrap() else {
        panic!("expected a unit task");
    };
    assert_eq!(second.id, near);

    // Only then does the out-of-circuit entry get handed out.
    let Some(Task::Unit(third)) = node.get_next_task(worker, ts(12)).unwrap() else {
        panic!("expected a unit task");
    };
    assert_eq!(third.id, far);
}

#[test]
fn expired_assignments_release_without_discarding_work() {
    let node = make_node();
    seed_category(&node, 1);
    seed_table(&node, 1, 1);
    let unit = node
        .register_unit(TableId::new(1), CategoryId::new(1))
        .unwrap();
    node.store().set_load_order(unit, Some(1.0)).unwrap();

    let mut settings = test_settings();
    settings.assignment_timeout_secs = 60;
    node.settings().replace(settings).unwrap();
    node.run_scheduler().unwrap();

    let worker = SubmitterId::new(3);
    let task = node.get_next_task(worker, ts(100)).unwrap();
    assert!(matches!(task, Some(Task::Unit(_))));
    assert_eq!(node.store().get_unit(unit).unwrap().assigned_count, 1);

    // The worker's half-typed submission arrives late; meanwhile the sweep
    // frees the unit for others without touching the row.
    assert_eq!(node.run_timeout_sweep(ts(130)).unwrap(), 0);
    assert_eq!(node.run_timeout_sweep(ts(161)).unwrap(), 1);
    assert_eq!(node.store().get_unit(unit).unwrap().assigned_count, 0);

    submit_full(&node, unit, 3, SubmissionSource::Web, &[(1, 10)]);
    assert_eq!(
        node.store().live_submissions_for_unit(unit).unwrap().len(),
        1
    );
}

// ── Configuration scenarios ─────────────────────────────────────────────

#[test]
fn hot_reload_changes_the_match_threshold() {
    let node = make_node();
    seed_table(&node, 1, 1);
    seed_category(&node, 1);
    let unit = node
        .register_unit(TableId::new(1), CategoryId::new(1))
        .unwrap();

    let mut strict = test_settings();
    strict.min_matching_submissions = 3;
    node.settings().replace(strict).unwrap();

    submit_full(&node, unit, 1, SubmissionSource::Web, &[(1, 10)]);
    submit_full(&node, unit, 2, SubmissionSource::Web, &[(1, 10)]);
    node.run_consolidation(ts(20));
    // Two matches no longer suffice.
    assert_eq!(
        node.get_unit_status(unit).unwrap().0,
        UnitStatus::FullUnconfirmed
    );

    submit_full(&node, unit, 3, SubmissionSource::Web, &[(1, 10)]);
    node.run_consolidation(ts(21));
    assert_eq!(
        node.get_unit_status(unit).unwrap().0,
        UnitStatus::FullConfirmedDouble
    );
}

#[test]
fn attachment_problem_reports_flag_the_photo() {
    let node = make_node();
    seed_category(&node, 1);
    seed_table(&node, 1, 1);
    let attachment = node.register_attachment(ts(1)).unwrap();

    for submitter in 1..=2 {
        node.report_problem(
            ProblemTarget::Attachment(attachment),
            SubmitterId::new(submitter),
            ProblemKind::InvalidPhoto,
            None,
            ts(5),
        )
        .unwrap();
    }
    node.run_consolidation(ts(6));

    assert_eq!(
        node.store().get_attachment(attachment).unwrap().status,
        AttachmentStatus::HasProblem
    );
}
