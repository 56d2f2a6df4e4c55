//! Shared utilities for the recount engine.

pub mod logging;
pub mod stats;

pub use logging::init_tracing;
pub use stats::StatsCounter;
