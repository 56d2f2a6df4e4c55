//! Problem report table.

use crate::{lock, MemoryStore};
use recount_store::{NewProblem, ProblemRow, ProblemScope, ProblemStore, StoreError};
use recount_types::{ProblemId, ProblemState};
use std::sync::atomic::Ordering;

impl ProblemStore for MemoryStore {
    fn insert_problem(&self, new: NewProblem) -> Result<ProblemId, StoreError> {
        let id = ProblemId::new(self.problem_seq.fetch_add(1, Ordering::SeqCst));
        lock(&self.problems)?.insert(
            id.raw(),
            ProblemRow {
                id,
                scope: new.scope,
                kind: new.kind,
                description: new.description,
                state: new.state,
                reporter: new.reporter,
                at: new.at,
            },
        );
        Ok(id)
    }

    fn get_problem(&self, id: ProblemId) -> Result<ProblemRow, StoreError> {
        lock(&self.problems)?
            .get(&id.raw())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn set_problem_state(&self, id: ProblemId, state: ProblemState) -> Result<(), StoreError> {
        let mut rows = lock(&self.problems)?;
        let row = rows
            .get_mut(&id.raw())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        row.state = state;
        Ok(())
    }

    fn problems_for(
        &self,
        scope: ProblemScope,
        state: ProblemState,
    ) -> Result<Vec<ProblemRow>, StoreError> {
        let mut rows: Vec<ProblemRow> = lock(&self.problems)?
            .values()
            .filter(|p| p.scope == scope && p.state == state)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }
}
