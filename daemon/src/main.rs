//! recount daemon — entry point for running the consolidation engine.

use clap::Parser;
use recount_node::{spawn_background_tasks, Node, NodeConfig};
use recount_store_memory::MemoryStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "recount-daemon", about = "recount consolidation engine daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags override them.
    #[arg(long, env = "RECOUNT_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds between batch reconciliation runs.
    #[arg(long, env = "RECOUNT_CONSOLIDATION_INTERVAL")]
    consolidation_interval: Option<u64>,

    /// Seconds between queue rebuilds.
    #[arg(long, env = "RECOUNT_SCHEDULER_INTERVAL")]
    scheduler_interval: Option<u64>,

    /// Seconds between assignment timeout sweeps.
    #[arg(long, env = "RECOUNT_TIMEOUT_SWEEP_INTERVAL")]
    timeout_sweep_interval: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, env = "RECOUNT_LOG_FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(&path.display().to_string())?,
        None => NodeConfig::default(),
    };
    if let Some(secs) = cli.consolidation_interval {
        config.consolidation_interval_secs = secs;
    }
    if let Some(secs) = cli.scheduler_interval {
        config.scheduler_interval_secs = secs;
    }
    if let Some(secs) = cli.timeout_sweep_interval {
        config.timeout_sweep_interval_secs = secs;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    if config.log_format == "json" {
        recount_utils::logging::init_tracing_json();
    } else {
        recount_utils::init_tracing();
    }

    tracing::info!(
        consolidation = config.consolidation_interval_secs,
        scheduler = config.scheduler_interval_secs,
        sweep = config.timeout_sweep_interval_secs,
        "starting recount engine"
    );

    let store = Arc::new(MemoryStore::new());
    let node = Arc::new(Node::new(store, config.settings.clone()));
    let handles = spawn_background_tasks(Arc::clone(&node), &config);

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    for handle in handles {
        handle.abort();
    }

    let stats = node.stats().snapshot();
    tracing::info!(?stats, "engine stopped");
    Ok(())
}
