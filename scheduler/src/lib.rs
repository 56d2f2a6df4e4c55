//! Task scheduling — decides which unit of work the next available worker
//! gets.
//!
//! The scheduler materializes outstanding work into a claimable queue:
//!
//! - [`priority_map`] — piecewise `[from%, to%) → weight` maps, composed per
//!   unit as (section map × category map), each falling back to the
//!   system-wide default.
//! - [`load_order`] — the per-unit priority coefficient, recomputed when an
//!   attachment (dis)associates with the unit's table or the unit's
//!   assignment set changes.
//! - [`queue`] — the periodic rebuild that interleaves vote-count and
//!   identification work into the queue.
//! - [`claim`] — atomic claims with per-worker exclusion and geographic
//!   affinity.
//! - [`timeout`] — releasing assignments held past the timeout without
//!   discarding the worker's in-progress submission.

pub mod claim;
pub mod error;
pub mod load_order;
pub mod priority_map;
pub mod queue;
pub mod timeout;

pub use claim::{claim_next, Task};
pub use error::SchedulerError;
pub use load_order::{refresh_unit_load_order, refresh_units_for_table};
pub use priority_map::{MapProduct, MapWithDefault, PriorityMap, PriorityRange};
pub use queue::rebuild_queue;
pub use timeout::release_expired_assignments;
