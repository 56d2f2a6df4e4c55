//! Worker-session state: active session count and scheduling affinity.

use crate::StoreError;
use recount_types::{CircuitId, SubmitterId};

pub trait WorkerStore {
    /// How many workers currently hold a session. Reported by the I/O layer;
    /// the scheduler reads it to size the queue.
    fn active_sessions(&self) -> Result<u64, StoreError>;

    fn set_active_sessions(&self, count: u64) -> Result<(), StoreError>;

    /// The circuit this worker last claimed work in.
    fn affine_circuit(&self, worker: SubmitterId) -> Result<Option<CircuitId>, StoreError>;

    fn set_affine_circuit(
        &self,
        worker: SubmitterId,
        circuit: Option<CircuitId>,
    ) -> Result<(), StoreError>;
}
