//! Persistence collaborator
//!
//! The calculators never touch storage themselves; reconciliation talks to a
//! `ProgressStore` that owns entity state and the audit/spend logs. Two
//! reference implementations ship here: an in-memory store and a JSON
//! file-backed store.

pub mod json;
pub mod memory;

pub use json::{default_ledger_path, JsonStore};
pub use memory::{MemoryStore, StoreSnapshot};

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type AccountId = u64;
pub type RecordId = u64;

/// Which progression track an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    MasterSkill,
    AssistSkill,
    Cultivation,
}

impl EntityKind {
    /// Category tag used in audit records.
    pub fn category(&self) -> &'static str {
        match self {
            EntityKind::MasterSkill => "master",
            EntityKind::AssistSkill => "assist",
            EntityKind::Cultivation => "cultivation",
        }
    }
}

/// Identifies one skill or cultivation track of one account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub account_id: AccountId,
    pub kind: EntityKind,
    pub name: String,
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.account_id, self.kind.category(), self.name)
    }
}

/// Current level and experience of an entity. Skills carry no experience
/// dimension and store 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityState {
    pub level: u32,
    pub experience: u32,
}

/// One reconciled change to one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub account_id: AccountId,
    pub category: EntityKind,
    pub name: String,
    pub from_level: u32,
    pub to_level: u32,
    pub from_experience: Option<u32>,
    pub to_experience: Option<u32>,
    pub consumed_experience: u64,
    pub consumed_currency: u64,
    pub consumed_guild_contribution: u64,
    pub consumed_cultivation_experience: u64,
    pub date: NaiveDate,
}

/// One currency outlay of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendRecord {
    pub account_id: AccountId,
    pub amount: u64,
    pub date: NaiveDate,
    pub note: Option<String>,
}

/// Per-day spend total, produced by the date-range summary query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendSummary {
    pub date: NaiveDate,
    pub total: u64,
}

/// Store error types.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("ledger version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Storage contract the reconciler works against.
///
/// All calls are per-entity and independent; a failing call must leave the
/// store usable for the next one.
pub trait ProgressStore {
    /// Current level/experience of an entity.
    fn fetch_state(&self, entity: &EntityRef) -> Result<EntityState, StoreError>;

    /// Overwrite an entity's level/experience.
    fn persist_state(&mut self, entity: &EntityRef, state: EntityState) -> Result<(), StoreError>;

    /// Append one audit record, returning its id.
    fn append_audit(&mut self, record: AuditRecord) -> Result<RecordId, StoreError>;

    /// Append one spend record, returning its id.
    fn append_spend(&mut self, record: SpendRecord) -> Result<RecordId, StoreError>;
}

// ============================================================================
// Change Notification
// ============================================================================

/// A mutation that went through a store.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    StateChanged { entity: EntityRef, state: EntityState },
    AuditAppended { id: RecordId },
    SpendAppended { id: RecordId },
}

/// Callback invoked for every store mutation.
pub type ChangeListener = Box<dyn Fn(&ChangeEvent) + Send>;

/// Explicit subscription interface exposed by the store implementations,
/// replacing app-global "data changed" broadcasts. Nothing in the calculator
/// core depends on it.
#[derive(Default)]
pub struct ChangeFeed {
    listeners: Vec<ChangeListener>,
}

impl ChangeFeed {
    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &ChangeEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
