//! Consolidation errors.

use recount_scheduler::SchedulerError;
use recount_store::StoreError;
use recount_trust::TrustError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsolidationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Trust(#[from] TrustError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
