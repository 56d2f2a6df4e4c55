//! Worker-session state.

use crate::{lock, MemoryStore};
use recount_store::{StoreError, WorkerStore};
use recount_types::{CircuitId, SubmitterId};
use std::sync::atomic::Ordering;

impl WorkerStore for MemoryStore {
    fn active_sessions(&self) -> Result<u64, StoreError> {
        Ok(self.sessions.load(Ordering::SeqCst))
    }

    fn set_active_sessions(&self, count: u64) -> Result<(), StoreError> {
        self.sessions.store(count, Ordering::SeqCst);
        Ok(())
    }

    fn affine_circuit(&self, worker: SubmitterId) -> Result<Option<CircuitId>, StoreError> {
        Ok(lock(&self.affinities)?.get(&worker.raw()).copied())
    }

    fn set_affine_circuit(
        &self,
        worker: SubmitterId,
        circuit: Option<CircuitId>,
    ) -> Result<(), StoreError> {
        let mut map = lock(&self.affinities)?;
        match circuit {
            Some(c) => {
                map.insert(worker.raw(), c);
            }
            None => {
                map.remove(&worker.raw());
            }
        }
        Ok(())
    }
}
