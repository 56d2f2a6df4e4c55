//! Engine settings — every tunable the engine reads at runtime.
//!
//! All thresholds, deltas, and coefficients live in one serde struct that is
//! passed explicitly into each component operation. The node wraps it in an
//! atomically swappable handle so operators can hot-reload the whole set
//! process-wide; nothing in the engine reads a global.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One `[from%, to%) → weight` priority range, as written in configuration.
///
/// `first_n` optionally lets the first K units (by arrival order) take this
/// weight regardless of the percentage criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRangeSpec {
    pub from_pct: u32,
    pub to_pct: u32,
    pub weight: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_n: Option<u64>,
}

/// All runtime-tunable engine settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    // ── Consensus thresholds ─────────────────────────────────────────────
    /// Matching vote-count submissions needed to confirm by duplication.
    pub min_matching_submissions: u32,

    /// Matching identifications needed to resolve a photo to a table.
    pub min_matching_identifications: u32,

    /// Matching problem reports needed to confirm a problem on a work unit.
    pub min_problem_matches: u32,

    /// Matching problem identifications needed to confirm a photo problem.
    pub min_problem_identifications: u32,

    // ── Reputation scoring ───────────────────────────────────────────────
    /// Cumulative score at which a submitter flips to untrusted.
    pub untrusted_threshold: i64,

    /// Penalty for a vote-count submission diverging from the confirmed one.
    pub divergent_load_penalty: i64,

    /// Penalty for reporting a problem on a unit whose count later confirms.
    pub problem_on_confirmed_penalty: i64,

    /// Penalty for identifying a photo differently from the confirmed table.
    pub divergent_identification_penalty: i64,

    /// Penalty applied when an operator dismisses a reported problem.
    pub problem_rejected_penalty: i64,

    /// Reward (applied as a negative delta) for a submission matching the
    /// confirmed witness.
    pub confirmed_load_reward: i64,

    /// Reward for an identification matching the confirmed table.
    pub confirmed_identification_reward: i64,

    // ── Scheduling ───────────────────────────────────────────────────────
    /// Queue target length = max(active sessions, floor) × this factor.
    pub queue_growth_factor: f64,

    /// Prefer vote-count work while pending identification entries are fewer
    /// than pending load entries × this coefficient.
    pub id_vs_load_coefficient: f64,

    /// Subtracted from an entry's effective order when its circuit matches
    /// the worker's current affine circuit.
    pub affinity_bonus: i64,

    /// Seconds a worker may hold an assignment before the unit becomes
    /// claimable again.
    pub assignment_timeout_secs: u64,

    /// Lower bound for the session count in the queue-length formula, so the
    /// queue never starves during session churn.
    pub min_queue_floor: u32,

    /// System-wide default priority map keyed by section progress.
    pub section_priority_ranges: Vec<PriorityRangeSpec>,

    /// System-wide default priority map keyed by category progress.
    pub category_priority_ranges: Vec<PriorityRangeSpec>,

    /// Per-section priority overrides, keyed by raw section id. A section
    /// with no entry here uses the system-wide default.
    #[serde(default)]
    pub section_priority_overrides: BTreeMap<u32, Vec<PriorityRangeSpec>>,

    /// Per-category priority overrides, keyed by raw category id.
    #[serde(default)]
    pub category_priority_overrides: BTreeMap<u32, Vec<PriorityRangeSpec>>,
}

impl EngineSettings {
    /// Production defaults, mirroring the values the system went live with.
    pub fn standard() -> Self {
        Self {
            min_matching_submissions: 2,
            min_matching_identifications: 2,
            min_problem_matches: 2,
            min_problem_identifications: 2,

            untrusted_threshold: 500,
            divergent_load_penalty: 100,
            problem_on_confirmed_penalty: 150,
            divergent_identification_penalty: 200,
            problem_rejected_penalty: 50,
            confirmed_load_reward: 20,
            confirmed_identification_reward: 20,

            queue_growth_factor: 2.0,
            id_vs_load_coefficient: 2.0,
            affinity_bonus: 10,
            assignment_timeout_secs: 180,
            min_queue_floor: 10,

            // The first stretch of a section's tables is urgent (early
            // results projection), the long middle is routine.
            section_priority_ranges: vec![
                PriorityRangeSpec {
                    from_pct: 0,
                    to_pct: 2,
                    weight: 2,
                    first_n: None,
                },
                PriorityRangeSpec {
                    from_pct: 2,
                    to_pct: 10,
                    weight: 20,
                    first_n: None,
                },
                PriorityRangeSpec {
                    from_pct: 10,
                    to_pct: 100,
                    weight: 100,
                    first_n: None,
                },
            ],
            category_priority_ranges: vec![PriorityRangeSpec {
                from_pct: 0,
                to_pct: 100,
                weight: 100,
                first_n: None,
            }],

            section_priority_overrides: BTreeMap::new(),
            category_priority_overrides: BTreeMap::new(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::standard()
    }
}
