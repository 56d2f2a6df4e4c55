//! Batch drivers over unprocessed submissions.
//!
//! Each driver run picks up the units/attachments that have unprocessed rows
//! and reconciles them one by one. Two rules keep concurrent arrivals and
//! partial failures safe:
//!
//! - The id set to mark processed is captured per item **before** any
//!   side-effecting work, and only that set is marked at the end. A row that
//!   arrives while an item reconciles stays unprocessed and is considered on
//!   the next run.
//! - Items are isolated: a failing item is logged and left unprocessed for
//!   retry; its siblings commit normally. No error escapes a driver.

use crate::{reconcile_attachment, reconcile_work_unit};
use recount_store::Store;
use recount_types::{EngineSettings, Timestamp};
use tracing::{debug, warn};

/// What one driver run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriverReport {
    /// Items (units or attachments) successfully reconciled.
    pub items: usize,
    /// Submission rows marked processed.
    pub rows_processed: usize,
    /// Items that failed and were left for retry.
    pub failures: usize,
}

impl DriverReport {
    fn merged(self, other: DriverReport) -> DriverReport {
        DriverReport {
            items: self.items + other.items,
            rows_processed: self.rows_processed + other.rows_processed,
            failures: self.failures + other.failures,
        }
    }
}

/// Reconcile every attachment with unprocessed identifications.
pub fn consume_new_identifications<S: Store>(
    store: &S,
    settings: &EngineSettings,
    now: Timestamp,
) -> DriverReport {
    let mut report = DriverReport::default();
    let attachments = match store.attachments_with_unprocessed() {
        Ok(attachments) => attachments,
        Err(e) => {
            warn!(error = %e, "could not list attachments with novelties");
            return report;
        }
    };

    for attachment in attachments {
        let captured = match store.unprocessed_ids_for_attachment(attachment) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(%attachment, error = %e, "could not capture identification ids");
                report.failures += 1;
                continue;
            }
        };
        match reconcile_attachment(store, settings, attachment, now) {
            Ok(status) => match store.mark_identifications_processed(&captured) {
                Ok(()) => {
                    debug!(%attachment, ?status, rows = captured.len(), "identifications consumed");
                    report.items += 1;
                    report.rows_processed += captured.len();
                }
                Err(e) => {
                    warn!(%attachment, error = %e, "could not mark identifications processed");
                    report.failures += 1;
                }
            },
            Err(e) => {
                warn!(%attachment, error = %e, "attachment reconciliation failed; left for retry");
                report.failures += 1;
            }
        }
    }
    report
}

/// Reconcile every work unit with unprocessed vote-count submissions.
pub fn consume_new_submissions<S: Store>(
    store: &S,
    settings: &EngineSettings,
    now: Timestamp,
) -> DriverReport {
    let mut report = DriverReport::default();
    let units = match store.units_with_unprocessed() {
        Ok(units) => units,
        Err(e) => {
            warn!(error = %e, "could not list units with novelties");
            return report;
        }
    };

    for unit in units {
        let captured = match store.unprocessed_ids_for_unit(unit) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(%unit, error = %e, "could not capture submission ids");
                report.failures += 1;
                continue;
            }
        };
        match reconcile_work_unit(store, settings, unit, now) {
            Ok(status) => match store.mark_submissions_processed(&captured) {
                Ok(()) => {
                    debug!(%unit, %status, rows = captured.len(), "submissions consumed");
                    report.items += 1;
                    report.rows_processed += captured.len();
                }
                Err(e) => {
                    warn!(%unit, error = %e, "could not mark submissions processed");
                    report.failures += 1;
                }
            },
            Err(e) => {
                warn!(%unit, error = %e, "unit reconciliation failed; left for retry");
                report.failures += 1;
            }
        }
    }
    report
}

/// One full pass: identifications first (they unlock units), then counts.
pub fn consume_novelties<S: Store>(
    store: &S,
    settings: &EngineSettings,
    now: Timestamp,
) -> DriverReport {
    let identifications = consume_new_identifications(store, settings, now);
    let submissions = consume_new_submissions(store, settings, now);
    identifications.merged(submissions)
}
