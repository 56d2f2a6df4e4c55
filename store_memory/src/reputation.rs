//! Reputation ledger tables.

use crate::{lock, MemoryStore};
use recount_store::{
    NewReputationEvent, NewTrustChange, ReputationEventRow, ReputationStore, StoreError,
    TrustChangeRow,
};
use recount_types::{ReputationEventId, SubmitterId};
use std::sync::atomic::Ordering;

impl ReputationStore for MemoryStore {
    fn append_reputation_event(
        &self,
        new: NewReputationEvent,
    ) -> Result<ReputationEventId, StoreError> {
        let id = ReputationEventId::new(self.event_seq.fetch_add(1, Ordering::SeqCst));
        lock(&self.events)?.push(ReputationEventRow {
            id,
            submitter: new.submitter,
            delta: new.delta,
            cause: new.cause,
            automatic: new.automatic,
            actor: new.actor,
            unit: new.unit,
            attachment: new.attachment,
            table: new.table,
            at: new.at,
        });
        Ok(id)
    }

    fn reputation_events_for(
        &self,
        submitter: SubmitterId,
    ) -> Result<Vec<ReputationEventRow>, StoreError> {
        Ok(lock(&self.events)?
            .iter()
            .filter(|e| e.submitter == submitter)
            .cloned()
            .collect())
    }

    fn reputation_score(&self, submitter: SubmitterId) -> Result<i64, StoreError> {
        Ok(lock(&self.events)?
            .iter()
            .filter(|e| e.submitter == submitter)
            .map(|e| e.delta)
            .sum())
    }

    fn is_untrusted(&self, submitter: SubmitterId) -> Result<bool, StoreError> {
        Ok(lock(&self.untrusted)?.contains(&submitter.raw()))
    }

    fn set_untrusted(&self, submitter: SubmitterId, untrusted: bool) -> Result<(), StoreError> {
        let mut set = lock(&self.untrusted)?;
        if untrusted {
            set.insert(submitter.raw());
        } else {
            set.remove(&submitter.raw());
        }
        Ok(())
    }

    fn append_trust_change(&self, new: NewTrustChange) -> Result<(), StoreError> {
        lock(&self.trust_changes)?.push(TrustChangeRow {
            submitter: new.submitter,
            untrusted: new.untrusted,
            automatic: new.automatic,
            actor: new.actor,
            trigger: new.trigger,
            at: new.at,
        });
        Ok(())
    }

    fn trust_changes_for(
        &self,
        submitter: SubmitterId,
    ) -> Result<Vec<TrustChangeRow>, StoreError> {
        Ok(lock(&self.trust_changes)?
            .iter()
            .filter(|c| c.submitter == submitter)
            .cloned()
            .collect())
    }
}
