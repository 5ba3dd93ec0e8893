//! In-memory store
//!
//! Reference collaborator used by tests and by callers that assemble entity
//! state themselves (for example after fetching an account's skills and
//! cultivations concurrently and joining the results).

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    AccountId, AuditRecord, ChangeEvent, ChangeFeed, ChangeListener, EntityRef, EntityState,
    ProgressStore, RecordId, SpendRecord, SpendSummary, StoreError,
};

/// Serializable image of a store's contents, used by the JSON store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub states: Vec<(EntityRef, EntityState)>,
    pub audits: Vec<(RecordId, AuditRecord)>,
    pub spends: Vec<(RecordId, SpendRecord)>,
    pub next_id: RecordId,
}

/// In-memory persistence collaborator.
#[derive(Debug, Default)]
pub struct MemoryStore {
    states: HashMap<EntityRef, EntityState>,
    audits: Vec<(RecordId, AuditRecord)>,
    spends: Vec<(RecordId, SpendRecord)>,
    next_id: RecordId,
    feed: ChangeFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { next_id: 1, ..Self::default() }
    }

    /// Seed an entity. Overwrites any existing state without billing.
    pub fn insert_entity(&mut self, entity: EntityRef, state: EntityState) {
        self.states.insert(entity, state);
    }

    /// Register a listener for every mutation going through this store.
    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.feed.subscribe(listener);
    }

    /// All audit records of one account, in append order.
    pub fn audits_for_account(&self, account_id: AccountId) -> Vec<&AuditRecord> {
        self.audits
            .iter()
            .filter(|(_, record)| record.account_id == account_id)
            .map(|(_, record)| record)
            .collect()
    }

    /// All spend records of one account, in append order.
    pub fn spends_for_account(&self, account_id: AccountId) -> Vec<&SpendRecord> {
        self.spends
            .iter()
            .filter(|(_, record)| record.account_id == account_id)
            .map(|(_, record)| record)
            .collect()
    }

    /// Per-day spend totals of one account over an inclusive date range.
    pub fn spend_summary(
        &self,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<SpendSummary> {
        let mut totals: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for (_, record) in &self.spends {
            if record.account_id == account_id && record.date >= from && record.date <= to {
                *totals.entry(record.date).or_insert(0) += record.amount;
            }
        }
        totals
            .into_iter()
            .map(|(date, total)| SpendSummary { date, total })
            .collect()
    }

    /// Copy out the store contents, states sorted for stable files.
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut states: Vec<_> = self
            .states
            .iter()
            .map(|(entity, state)| (entity.clone(), *state))
            .collect();
        states.sort_by(|a, b| a.0.cmp(&b.0));
        StoreSnapshot {
            states,
            audits: self.audits.clone(),
            spends: self.spends.clone(),
            next_id: self.next_id,
        }
    }

    /// Rebuild a store from a snapshot. Listeners are not carried over.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            states: snapshot.states.into_iter().collect(),
            audits: snapshot.audits,
            spends: snapshot.spends,
            next_id: snapshot.next_id.max(1),
            feed: ChangeFeed::default(),
        }
    }

    fn allocate_id(&mut self) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl ProgressStore for MemoryStore {
    fn fetch_state(&self, entity: &EntityRef) -> Result<EntityState, StoreError> {
        self.states
            .get(entity)
            .copied()
            .ok_or_else(|| StoreError::UnknownEntity(entity.to_string()))
    }

    fn persist_state(&mut self, entity: &EntityRef, state: EntityState) -> Result<(), StoreError> {
        match self.states.get_mut(entity) {
            Some(stored) => {
                *stored = state;
                self.feed.emit(&ChangeEvent::StateChanged { entity: entity.clone(), state });
                Ok(())
            }
            None => Err(StoreError::UnknownEntity(entity.to_string())),
        }
    }

    fn append_audit(&mut self, record: AuditRecord) -> Result<RecordId, StoreError> {
        let id = self.allocate_id();
        self.audits.push((id, record));
        self.feed.emit(&ChangeEvent::AuditAppended { id });
        Ok(id)
    }

    fn append_spend(&mut self, record: SpendRecord) -> Result<RecordId, StoreError> {
        let id = self.allocate_id();
        self.spends.push((id, record));
        self.feed.emit(&ChangeEvent::SpendAppended { id });
        Ok(id)
    }
}
