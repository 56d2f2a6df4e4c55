//! Scheduler errors.

use recount_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Priority ranges overlap. Raised at map construction so a bad
    /// configuration is rejected before it can order anything.
    #[error("priority ranges overlap: <{0}> and <{1}>")]
    OverlappingRanges(String, String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
