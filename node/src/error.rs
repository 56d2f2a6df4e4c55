//! Node errors.

use recount_consolidation::ConsolidationError;
use recount_scheduler::SchedulerError;
use recount_store::StoreError;
use recount_trust::TrustError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Consolidation(#[from] ConsolidationError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Trust(#[from] TrustError),
}
