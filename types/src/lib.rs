//! Fundamental types for the recount engine.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: entity ids, timestamps, status enums, submission kinds and
//! sources, reported vote values with their canonical signatures, scoring
//! causes, and the hot-reloadable engine settings.

pub mod ids;
pub mod scoring;
pub mod settings;
pub mod status;
pub mod submission;
pub mod time;

pub use ids::{
    AttachmentId, CategoryId, CircuitId, IdentificationId, OptionId, ProblemId, QueueEntryId,
    ReputationEventId, SectionId, SubmissionId, SubmitterId, TableId, WorkUnitId,
};
pub use scoring::ScoringCause;
pub use settings::{EngineSettings, PriorityRangeSpec};
pub use status::{AttachmentStatus, ProblemKind, ProblemState, UnitStatus};
pub use submission::{
    IdentificationClaim, ReportedVotes, Signature, SubmissionKind, SubmissionSource, VoteEntry,
};
pub use time::Timestamp;
