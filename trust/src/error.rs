//! Trust-scoring errors.

use recount_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrustError {
    /// Two submissions cannot be diffed: they belong to different units or
    /// report different option sets. Callers must log this and apply no
    /// score effect — it is never a zero divergence.
    #[error("submissions are not comparable: {0}")]
    Incomparable(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
