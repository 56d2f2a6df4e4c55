//! Problem report storage trait.

use crate::StoreError;
use recount_types::{AttachmentId, ProblemId, ProblemKind, ProblemState, SubmitterId, TableId, Timestamp};
use serde::{Deserialize, Serialize};

/// What a problem report is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemScope {
    Table(TableId),
    Attachment(AttachmentId),
}

/// A reported, confirmed, or resolved problem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProblemRow {
    pub id: ProblemId,
    pub scope: ProblemScope,
    pub kind: ProblemKind,
    pub description: Option<String>,
    pub state: ProblemState,
    pub reporter: Option<SubmitterId>,
    pub at: Timestamp,
}

#[derive(Clone, Debug)]
pub struct NewProblem {
    pub scope: ProblemScope,
    pub kind: ProblemKind,
    pub description: Option<String>,
    pub state: ProblemState,
    pub reporter: Option<SubmitterId>,
    pub at: Timestamp,
}

pub trait ProblemStore {
    fn insert_problem(&self, new: NewProblem) -> Result<ProblemId, StoreError>;

    fn get_problem(&self, id: ProblemId) -> Result<ProblemRow, StoreError>;

    fn set_problem_state(&self, id: ProblemId, state: ProblemState) -> Result<(), StoreError>;

    /// Problems for a scope in a given state.
    fn problems_for(
        &self,
        scope: ProblemScope,
        state: ProblemState,
    ) -> Result<Vec<ProblemRow>, StoreError>;
}
