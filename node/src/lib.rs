//! Node wiring for the recount engine.
//!
//! A [`Node`] owns the shared store and the hot-reloadable settings, exposes
//! the external interface the I/O layer talks to (submit, claim, query), and
//! runs the periodic maintenance loops (consume novelties, rebuild the
//! queue, sweep expired assignments).

pub mod config;
pub mod error;
pub mod node;
pub mod settings;
pub mod tasks;

pub use config::NodeConfig;
pub use error::NodeError;
pub use node::{Node, ProblemTarget, Reputation};
pub use settings::SettingsHandle;
pub use tasks::spawn_background_tasks;
