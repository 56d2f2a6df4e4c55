//! Property-based fuzz tests for serialization boundaries.
//!
//! Every row type that crosses the storage boundary must survive a bincode
//! serialize → deserialize roundtrip for arbitrary valid inputs.

use proptest::prelude::*;

use recount_store::{
    AttachmentRow, IdentificationRow, QueueEntryRow, ReputationEventRow, SubmissionRow, TaskRef,
    WorkUnitRow,
};
use recount_types::{
    AttachmentId, AttachmentStatus, CategoryId, CircuitId, IdentificationClaim, IdentificationId,
    OptionId, ProblemKind, QueueEntryId, ReportedVotes, ReputationEventId, ScoringCause,
    SubmissionId, SubmissionKind, SubmissionSource, SubmitterId, TableId, Timestamp, UnitStatus,
    VoteEntry, WorkUnitId,
};

// ---------------------------------------------------------------------------
// Proptest strategies for core types
// ---------------------------------------------------------------------------

fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    (0u64..=u64::MAX / 2).prop_map(Timestamp::new)
}

fn arb_kind() -> impl Strategy<Value = SubmissionKind> {
    prop_oneof![
        Just(SubmissionKind::Problem),
        Just(SubmissionKind::Partial),
        Just(SubmissionKind::Full),
    ]
}

fn arb_source() -> impl Strategy<Value = SubmissionSource> {
    prop_oneof![
        Just(SubmissionSource::Web),
        Just(SubmissionSource::Csv),
        Just(SubmissionSource::Telegram),
    ]
}

fn arb_unit_status() -> impl Strategy<Value = UnitStatus> {
    prop_oneof![
        Just(UnitStatus::Empty),
        Just(UnitStatus::PartialUnconfirmed),
        Just(UnitStatus::PartialInConflict),
        Just(UnitStatus::PartialConfirmedCsv),
        Just(UnitStatus::PartialConfirmedDouble),
        Just(UnitStatus::FullUnconfirmed),
        Just(UnitStatus::FullInConflict),
        Just(UnitStatus::FullConfirmedCsv),
        Just(UnitStatus::FullConfirmedDouble),
        Just(UnitStatus::HasProblem),
    ]
}

fn arb_problem_kind() -> impl Strategy<Value = ProblemKind> {
    prop_oneof![
        Just(ProblemKind::MissingSheet),
        Just(ProblemKind::IllegibleSheet),
        Just(ProblemKind::InvalidPhoto),
    ]
}

fn arb_cause() -> impl Strategy<Value = ScoringCause> {
    prop_oneof![
        Just(ScoringCause::DivergentLoad),
        Just(ScoringCause::ProblemOnConfirmedUnit),
        Just(ScoringCause::DivergentIdentification),
        Just(ScoringCause::ProblemRejected),
        Just(ScoringCause::ExplicitMark),
        Just(ScoringCause::MarkRemoval),
        Just(ScoringCause::ConfirmedLoad),
        Just(ScoringCause::ConfirmedIdentification),
    ]
}

fn arb_reported() -> impl Strategy<Value = ReportedVotes> {
    proptest::collection::vec((0u32..500, proptest::option::of(0u32..100_000)), 0..12).prop_map(
        |entries| {
            ReportedVotes::new(
                entries
                    .into_iter()
                    .map(|(option, votes)| VoteEntry {
                        option: OptionId::new(option),
                        votes,
                    })
                    .collect(),
            )
        },
    )
}

fn arb_claim() -> impl Strategy<Value = IdentificationClaim> {
    prop_oneof![
        (0u32..10_000).prop_map(|t| IdentificationClaim::Table(TableId::new(t))),
        arb_problem_kind().prop_map(IdentificationClaim::Problem),
    ]
}

fn arb_submission_row() -> impl Strategy<Value = SubmissionRow> {
    (
        0u64..u64::MAX / 2,
        0u64..u64::MAX / 2,
        0u64..u64::MAX / 2,
        arb_kind(),
        arb_source(),
        arb_reported(),
        any::<bool>(),
        any::<bool>(),
        arb_timestamp(),
    )
        .prop_map(
            |(id, unit, submitter, kind, source, reported, processed, invalidated, at)| {
                let signature = Some(reported.signature());
                SubmissionRow {
                    id: SubmissionId::new(id),
                    unit: WorkUnitId::new(unit),
                    submitter: SubmitterId::new(submitter),
                    kind,
                    source,
                    reported,
                    signature,
                    processed,
                    invalidated,
                    created_at: at,
                }
            },
        )
}

// ---------------------------------------------------------------------------
// Roundtrip properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn submission_rows_roundtrip(row in arb_submission_row()) {
        let bytes = bincode::serialize(&row).unwrap();
        let back: SubmissionRow = bincode::deserialize(&bytes).unwrap();
        prop_assert_eq!(back, row);
    }

    #[test]
    fn identification_rows_roundtrip(
        id in 0u64..u64::MAX / 2,
        attachment in 0u64..u64::MAX / 2,
        submitter in 0u64..u64::MAX / 2,
        claim in arb_claim(),
        source in arb_source(),
        processed in any::<bool>(),
        invalidated in any::<bool>(),
        at in arb_timestamp(),
    ) {
        let row = IdentificationRow {
            id: IdentificationId::new(id),
            attachment: AttachmentId::new(attachment),
            submitter: SubmitterId::new(submitter),
            claim,
            source,
            processed,
            invalidated,
            created_at: at,
        };
        let bytes = bincode::serialize(&row).unwrap();
        let back: IdentificationRow = bincode::deserialize(&bytes).unwrap();
        prop_assert_eq!(back, row);
    }

    #[test]
    fn work_unit_rows_roundtrip(
        id in 0u64..u64::MAX / 2,
        table in 0u32..u32::MAX / 2,
        category in 0u32..u32::MAX / 2,
        status in arb_unit_status(),
        witness in proptest::option::of(0u64..u64::MAX / 2),
        load_order in proptest::option::of(0.0f64..1e12),
        assigned in 0u32..64,
        taken in proptest::option::of(arb_timestamp()),
    ) {
        let row = WorkUnitRow {
            id: WorkUnitId::new(id),
            table: TableId::new(table),
            category: CategoryId::new(category),
            status,
            witness: witness.map(SubmissionId::new),
            load_order,
            assigned_count: assigned,
            taken_at: taken,
        };
        let bytes = bincode::serialize(&row).unwrap();
        let back: WorkUnitRow = bincode::deserialize(&bytes).unwrap();
        prop_assert_eq!(back, row);
    }

    #[test]
    fn attachment_rows_roundtrip(
        id in 0u64..u64::MAX / 2,
        table in proptest::option::of(0u32..u32::MAX / 2),
        witness in proptest::option::of(0u64..u64::MAX / 2),
        assigned in 0u32..64,
        at in arb_timestamp(),
    ) {
        let row = AttachmentRow {
            id: AttachmentId::new(id),
            status: AttachmentStatus::Unidentified,
            table: table.map(TableId::new),
            witness: witness.map(IdentificationId::new),
            assigned_count: assigned,
            taken_at: None,
            created_at: at,
        };
        let bytes = bincode::serialize(&row).unwrap();
        let back: AttachmentRow = bincode::deserialize(&bytes).unwrap();
        prop_assert_eq!(back, row);
    }

    #[test]
    fn reputation_events_roundtrip(
        id in 0u64..u64::MAX / 2,
        submitter in 0u64..u64::MAX / 2,
        delta in i64::MIN / 2..i64::MAX / 2,
        cause in arb_cause(),
        automatic in any::<bool>(),
        at in arb_timestamp(),
    ) {
        let row = ReputationEventRow {
            id: ReputationEventId::new(id),
            submitter: SubmitterId::new(submitter),
            delta,
            cause,
            automatic,
            actor: None,
            unit: None,
            attachment: None,
            table: None,
            at,
        };
        let bytes = bincode::serialize(&row).unwrap();
        let back: ReputationEventRow = bincode::deserialize(&bytes).unwrap();
        prop_assert_eq!(back, row);
    }

    #[test]
    fn queue_entries_roundtrip(
        id in 0u64..u64::MAX / 2,
        order in i64::MIN / 2..i64::MAX / 2,
        unit in 0u64..u64::MAX / 2,
        circuit in proptest::option::of(0u32..u32::MAX / 2),
    ) {
        let row = QueueEntryRow {
            id: QueueEntryId::new(id),
            order,
            task: TaskRef::Unit(WorkUnitId::new(unit)),
            circuit: circuit.map(CircuitId::new),
        };
        let bytes = bincode::serialize(&row).unwrap();
        let back: QueueEntryRow = bincode::deserialize(&bytes).unwrap();
        prop_assert_eq!(back, row);
    }

    #[test]
    fn signatures_are_stable_across_reordering(mut entries in arb_reported()) {
        let original = entries.signature();
        entries.0.reverse();
        prop_assert_eq!(entries.signature(), original);
    }
}
