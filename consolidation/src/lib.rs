//! The consolidation engine.
//!
//! Volunteers submit overlapping, possibly conflicting observations; this
//! crate reduces them to one answer per unit of work:
//!
//! - [`tally`] — the per-tier voting rule over canonical signatures.
//! - [`work_unit`] — vote-count reconciliation for one (table, category)
//!   unit, partial tier then full tier.
//! - [`attachment`] — photo→table reconciliation, including the
//!   de-association cascade when a photo stops resolving to a table.
//! - [`driver`] — the batch drivers that pick up unprocessed submissions
//!   with per-item fault isolation.
//!
//! Reconciliation is idempotent: a unit's status is a pure function of its
//! live submissions, so re-running over the same rows rewrites the same
//! state.

pub mod attachment;
pub mod driver;
pub mod error;
pub mod outcome;
pub mod problem;
pub mod tally;
pub mod work_unit;

pub use attachment::reconcile_attachment;
pub use driver::{
    consume_new_identifications, consume_new_submissions, consume_novelties, DriverReport,
};
pub use error::ConsolidationError;
pub use outcome::{TallyOutcome, Tier};
pub use problem::dismiss_problem;
pub use tally::tally_votes;
pub use work_unit::reconcile_work_unit;
