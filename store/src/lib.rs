//! Abstract storage traits for the recount engine.
//!
//! Every storage backend (in-memory for now; a relational backend slots in
//! the same way) implements these traits. The rest of the workspace depends
//! only on the traits.
//!
//! Two conventions matter for correctness:
//!
//! - **Captured id sets.** Batch drivers call `unprocessed_ids_for_*` once,
//!   before doing any side-effecting work, and later pass exactly that set
//!   to `mark_processed`. Backends must never offer (and drivers must never
//!   simulate) a "mark everything unprocessed as processed" predicate, or
//!   rows arriving mid-batch would be retired without being considered.
//! - **Non-blocking claims.** `try_claim` and `try_release_expired` return
//!   `Ok(None)` / `Ok(vec![])` when the backend cannot take the relevant
//!   lock immediately. Contention is not an error; the caller simply gets
//!   nothing this round.

pub mod attachment;
pub mod error;
pub mod geo;
pub mod identification;
pub mod problem;
pub mod queue;
pub mod reputation;
pub mod submission;
pub mod work_unit;
pub mod worker;

pub use attachment::{AttachmentRow, AttachmentStore};
pub use error::StoreError;
pub use geo::{CategoryRow, GeoStore, TableRow};
pub use identification::{IdentificationRow, IdentificationStore, NewIdentification};
pub use problem::{NewProblem, ProblemRow, ProblemScope, ProblemStore};
pub use queue::{NewQueueEntry, QueueEntryRow, QueueStore, TaskRef};
pub use reputation::{
    NewReputationEvent, NewTrustChange, ReputationEventRow, ReputationStore, TrustChangeRow,
};
pub use submission::{NewSubmission, SubmissionRow, SubmissionStore};
pub use work_unit::{WorkUnitRow, WorkUnitStore};
pub use worker::WorkerStore;

/// Everything the engine needs from a backend, as one bound.
pub trait Store:
    WorkUnitStore
    + SubmissionStore
    + IdentificationStore
    + AttachmentStore
    + ReputationStore
    + QueueStore
    + GeoStore
    + ProblemStore
    + WorkerStore
{
}

impl<S> Store for S where
    S: WorkUnitStore
        + SubmissionStore
        + IdentificationStore
        + AttachmentStore
        + ReputationStore
        + QueueStore
        + GeoStore
        + ProblemStore
        + WorkerStore
{
}
