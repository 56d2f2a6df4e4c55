//! Periodic background tasks.
//!
//! Three independent loops: batch reconciliation, queue rebuild, and the
//! assignment timeout sweep. Each tick is self-contained — errors are logged
//! and the loop keeps ticking, matching the drivers' per-item isolation.

use crate::{Node, NodeConfig};
use recount_store::Store;
use recount_types::Timestamp;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, warn};

/// Spawn the three maintenance loops. The handles run until aborted.
pub fn spawn_background_tasks<S>(node: Arc<Node<S>>, config: &NodeConfig) -> Vec<JoinHandle<()>>
where
    S: Store + Send + Sync + 'static,
{
    let mut handles = Vec::new();

    let consolidation_node = Arc::clone(&node);
    let mut consolidation_tick = interval(Duration::from_secs(config.consolidation_interval_secs));
    handles.push(tokio::spawn(async move {
        loop {
            consolidation_tick.tick().await;
            let report = consolidation_node.run_consolidation(Timestamp::now());
            if report.items > 0 || report.failures > 0 {
                debug!(
                    items = report.items,
                    rows = report.rows_processed,
                    failures = report.failures,
                    "consolidation pass"
                );
            }
        }
    }));

    let scheduler_node = Arc::clone(&node);
    let mut scheduler_tick = interval(Duration::from_secs(config.scheduler_interval_secs));
    handles.push(tokio::spawn(async move {
        loop {
            scheduler_tick.tick().await;
            match scheduler_node.run_scheduler() {
                Ok(added) if added > 0 => debug!(added, "queue topped up"),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "queue rebuild failed"),
            }
        }
    }));

    let sweep_node = Arc::clone(&node);
    let mut sweep_tick = interval(Duration::from_secs(config.timeout_sweep_interval_secs));
    handles.push(tokio::spawn(async move {
        loop {
            sweep_tick.tick().await;
            if let Err(e) = sweep_node.run_timeout_sweep(Timestamp::now()) {
                warn!(error = %e, "timeout sweep failed");
            }
        }
    }));

    handles
}
