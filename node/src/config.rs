//! Node configuration with TOML file support.

use crate::NodeError;
use recount_scheduler::PriorityMap;
use recount_types::EngineSettings;
use serde::{Deserialize, Serialize};

/// Configuration for a recount node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Engine settings nest under a
/// `[settings]` table and can be hot-reloaded later through the settings
/// handle; the fields here only change on restart.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds between batch reconciliation runs.
    #[serde(default = "default_consolidation_interval")]
    pub consolidation_interval_secs: u64,

    /// Seconds between queue rebuilds.
    #[serde(default = "default_scheduler_interval")]
    pub scheduler_interval_secs: u64,

    /// Seconds between assignment timeout sweeps.
    #[serde(default = "default_timeout_sweep_interval")]
    pub timeout_sweep_interval_secs: u64,

    /// Engine settings (thresholds, deltas, coefficients).
    #[serde(default)]
    pub settings: EngineSettings,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_consolidation_interval() -> u64 {
    5
}

fn default_scheduler_interval() -> u64 {
    10
}

fn default_timeout_sweep_interval() -> u64 {
    30
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: NodeConfig =
            toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }

    /// Reject configurations that cannot order anything: every priority
    /// range list (default and per-section/category overrides) must be
    /// overlap-free. Startup aborts here rather than at first use.
    pub fn validate(&self) -> Result<(), NodeError> {
        validate_settings(&self.settings)
    }
}

/// Shared validation for startup config and hot reloads.
pub(crate) fn validate_settings(settings: &EngineSettings) -> Result<(), NodeError> {
    PriorityMap::from_specs(&settings.section_priority_ranges)
        .map_err(|e| NodeError::Config(e.to_string()))?;
    PriorityMap::from_specs(&settings.category_priority_ranges)
        .map_err(|e| NodeError::Config(e.to_string()))?;
    for specs in settings
        .section_priority_overrides
        .values()
        .chain(settings.category_priority_overrides.values())
    {
        PriorityMap::from_specs(specs).map_err(|e| NodeError::Config(e.to_string()))?;
    }
    Ok(())
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            consolidation_interval_secs: default_consolidation_interval(),
            scheduler_interval_secs: default_scheduler_interval(),
            timeout_sweep_interval_secs: default_timeout_sweep_interval(),
            settings: EngineSettings::default(),
        }
    }
}
