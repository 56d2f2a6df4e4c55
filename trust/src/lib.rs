//! Reputation scoring for anonymous-trust submitters.
//!
//! Every consolidation outcome feeds back here: submitters whose values match
//! the confirmed witness earn their score down, divergent ones earn it up,
//! and a submitter whose cumulative score crosses the configured threshold is
//! flipped to untrusted — which retroactively invalidates all of their live
//! submissions and re-queues the affected units for reconciliation.
//!
//! The ledger is append-only. A submitter's score is never stored; it is
//! always the sum of their event deltas, so the audit trail and the score
//! cannot drift apart.

pub mod diff;
pub mod engine;
pub mod error;

pub use diff::vote_divergence;
pub use engine::{
    apply_automatic_penalty, apply_automatic_reward, apply_operator_penalty, cascade_invalidate,
    clear_untrusted, mark_untrusted_explicit, EventContext,
};
pub use error::TrustError;
