//! In-memory storage backend.
//!
//! Thread-safe `Mutex`-guarded tables keyed by id. Every trait method is
//! individually atomic; the claim and sweep paths use `try_lock` so
//! concurrent claimers and timeout sweeps never stall on each other — a
//! contended lock simply yields nothing that round.
//!
//! Id counters are monotonic and never reused, so insertion order is
//! recoverable from ids (the queue and arrival-order logic rely on this).

mod attachment;
mod geo;
mod identification;
mod problem;
mod queue;
mod reputation;
mod submission;
mod work_unit;
mod worker;

use recount_store::{
    AttachmentRow, CategoryRow, IdentificationRow, ProblemRow, QueueEntryRow, ReputationEventRow,
    StoreError, SubmissionRow, TableRow, TrustChangeRow, WorkUnitRow,
};
use recount_types::CircuitId;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::AtomicU64;
use std::sync::{Mutex, MutexGuard};

/// The shared in-memory store. Cheap to construct; clone an `Arc` of it to
/// share across workers.
pub struct MemoryStore {
    pub(crate) units: Mutex<HashMap<u64, WorkUnitRow>>,
    pub(crate) submissions: Mutex<HashMap<u64, SubmissionRow>>,
    pub(crate) identifications: Mutex<HashMap<u64, IdentificationRow>>,
    pub(crate) attachments: Mutex<HashMap<u64, AttachmentRow>>,
    pub(crate) events: Mutex<Vec<ReputationEventRow>>,
    pub(crate) trust_changes: Mutex<Vec<TrustChangeRow>>,
    pub(crate) untrusted: Mutex<HashSet<u64>>,
    /// Keyed by (order, id) so iteration is already in claim order.
    pub(crate) queue: Mutex<BTreeMap<(i64, u64), QueueEntryRow>>,
    pub(crate) tables: Mutex<HashMap<u32, TableRow>>,
    pub(crate) categories: Mutex<HashMap<u32, CategoryRow>>,
    pub(crate) problems: Mutex<HashMap<u64, ProblemRow>>,
    pub(crate) affinities: Mutex<HashMap<u64, CircuitId>>,
    pub(crate) sessions: AtomicU64,
    /// Held (via `try_lock`) for the duration of a timeout sweep so two
    /// sweeps never double-release the same assignment.
    pub(crate) sweep_guard: Mutex<()>,

    pub(crate) unit_seq: AtomicU64,
    pub(crate) submission_seq: AtomicU64,
    pub(crate) identification_seq: AtomicU64,
    pub(crate) attachment_seq: AtomicU64,
    pub(crate) event_seq: AtomicU64,
    pub(crate) queue_seq: AtomicU64,
    pub(crate) problem_seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            units: Mutex::new(HashMap::new()),
            submissions: Mutex::new(HashMap::new()),
            identifications: Mutex::new(HashMap::new()),
            attachments: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
            trust_changes: Mutex::new(Vec::new()),
            untrusted: Mutex::new(HashSet::new()),
            queue: Mutex::new(BTreeMap::new()),
            tables: Mutex::new(HashMap::new()),
            categories: Mutex::new(HashMap::new()),
            problems: Mutex::new(HashMap::new()),
            affinities: Mutex::new(HashMap::new()),
            sessions: AtomicU64::new(0),
            sweep_guard: Mutex::new(()),
            unit_seq: AtomicU64::new(1),
            submission_seq: AtomicU64::new(1),
            identification_seq: AtomicU64::new(1),
            attachment_seq: AtomicU64::new(1),
            event_seq: AtomicU64::new(1),
            queue_seq: AtomicU64::new(1),
            problem_seq: AtomicU64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock a table, mapping a poisoned mutex to a backend error instead of
/// panicking inside the engine.
pub(crate) fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    m.lock()
        .map_err(|_| StoreError::Backend("poisoned lock".into()))
}
