//! Update reconciliation
//!
//! Takes a batch of proposed progression changes for one account, prices each
//! one through the calculators, persists the new entity states, appends one
//! audit record per entity and a single aggregated spend record for the whole
//! batch. A collaborator failure on one entity never stops the others; every
//! failure is captured in the returned report so the caller can resubmit.

use chrono::{Local, NaiveDate};

use crate::data::CostTables;
use crate::progression::{advance_cost, range_cost, top_up_cost};
use crate::progression::{CostResult, CultivationMode, SkillKind};
use crate::store::{
    AccountId, AuditRecord, EntityKind, EntityRef, EntityState, ProgressStore, RecordId,
    SpendRecord, StoreError,
};

/// Note attached to the aggregated spend record of a batch.
pub const RECONCILE_NOTE: &str = "auto-recorded progression update";

/// Proposed level change for one skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillChange {
    pub entity: EntityRef,
    pub kind: SkillKind,
    pub stored_level: u32,
    pub proposed_level: u32,
}

impl SkillChange {
    pub fn new(
        account_id: AccountId,
        kind: SkillKind,
        name: impl Into<String>,
        stored_level: u32,
        proposed_level: u32,
    ) -> Self {
        let entity_kind = match kind {
            SkillKind::Master => EntityKind::MasterSkill,
            SkillKind::Assist => EntityKind::AssistSkill,
        };
        Self {
            entity: EntityRef { account_id, kind: entity_kind, name: name.into() },
            kind,
            stored_level,
            proposed_level,
        }
    }
}

/// Proposed level/experience change for one cultivation track.
///
/// `proposed_exp` is the experience to land with: `None` on a level advance
/// requests no particular landing (the crossing is billed in full and the
/// track lands at 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CultivationChange {
    pub entity: EntityRef,
    pub mode: CultivationMode,
    pub stored: EntityState,
    pub proposed_level: u32,
    pub proposed_exp: Option<u32>,
}

impl CultivationChange {
    pub fn new(
        account_id: AccountId,
        mode: CultivationMode,
        name: impl Into<String>,
        stored: EntityState,
        proposed_level: u32,
        proposed_exp: Option<u32>,
    ) -> Self {
        Self {
            entity: EntityRef { account_id, kind: EntityKind::Cultivation, name: name.into() },
            mode,
            stored,
            proposed_level,
            proposed_exp,
        }
    }
}

/// One entry of a reconciliation batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityUpdate {
    Skill(SkillChange),
    Cultivation(CultivationChange),
}

impl EntityUpdate {
    pub fn entity(&self) -> &EntityRef {
        match self {
            EntityUpdate::Skill(change) => &change.entity,
            EntityUpdate::Cultivation(change) => &change.entity,
        }
    }

    /// Whether the proposed state differs from the stored state at all.
    fn differs(&self) -> bool {
        match self {
            EntityUpdate::Skill(change) => change.proposed_level != change.stored_level,
            EntityUpdate::Cultivation(change) => {
                change.proposed_level != change.stored.level
                    || matches!(change.proposed_exp, Some(exp) if exp != change.stored.experience)
            }
        }
    }
}

/// A collaborator call that failed during reconciliation.
#[derive(Debug, Clone)]
pub enum BatchFailure {
    Entity { entity: EntityRef, error: StoreError },
    SpendLog { error: StoreError },
}

/// Outcome of one reconciliation batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Entities whose state change and audit record both landed.
    pub applied: Vec<EntityRef>,
    pub failures: Vec<BatchFailure>,
    /// Currency consumed by all successfully persisted entities.
    pub total_currency: u64,
    /// Id of the aggregated spend record, when the total was nonzero.
    pub spend_record: Option<RecordId>,
}

impl BatchReport {
    /// True when every collaborator call in the batch succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reconcile a batch dated at submission time.
pub fn reconcile(
    store: &mut dyn ProgressStore,
    tables: &CostTables,
    account_id: AccountId,
    updates: &[EntityUpdate],
) -> BatchReport {
    reconcile_dated(store, tables, account_id, updates, Local::now().date_naive())
}

/// Reconcile a batch with an explicit record date.
pub fn reconcile_dated(
    store: &mut dyn ProgressStore,
    tables: &CostTables,
    account_id: AccountId,
    updates: &[EntityUpdate],
    date: NaiveDate,
) -> BatchReport {
    let mut report = BatchReport::default();

    for update in updates {
        if !update.differs() {
            continue;
        }
        let entity = update.entity().clone();
        let (cost, new_state, audit) = plan(update, tables, date);

        if let Err(error) = store.persist_state(&entity, new_state) {
            log::warn!("Failed to persist {}: {}", entity, error);
            report.failures.push(BatchFailure::Entity { entity, error });
            continue;
        }
        // The entity's consumption counts once its state actually changed.
        report.total_currency += cost.currency;

        match store.append_audit(audit) {
            Ok(_) => report.applied.push(entity),
            Err(error) => {
                log::warn!("Failed to audit {}: {}", entity, error);
                report.failures.push(BatchFailure::Entity { entity, error });
            }
        }
    }

    if report.total_currency > 0 {
        let record = SpendRecord {
            account_id,
            amount: report.total_currency,
            date,
            note: Some(RECONCILE_NOTE.to_string()),
        };
        match store.append_spend(record) {
            Ok(id) => report.spend_record = Some(id),
            Err(error) => {
                log::warn!("Failed to record spend for account {}: {}", account_id, error);
                report.failures.push(BatchFailure::SpendLog { error });
            }
        }
    }

    log::info!(
        "Reconciled account {}: {} applied, {} failed, {} currency",
        account_id,
        report.applied.len(),
        report.failures.len(),
        report.total_currency
    );
    report
}

/// Price one update and shape its new state and audit record.
fn plan(update: &EntityUpdate, tables: &CostTables, date: NaiveDate) -> (CostResult, EntityState, AuditRecord) {
    match update {
        EntityUpdate::Skill(change) => {
            let cost = range_cost(tables, change.kind, change.stored_level, change.proposed_level);
            let new_state = EntityState { level: change.proposed_level, experience: 0 };
            let audit = AuditRecord {
                account_id: change.entity.account_id,
                category: change.entity.kind,
                name: change.entity.name.clone(),
                from_level: change.stored_level,
                to_level: change.proposed_level,
                from_experience: None,
                to_experience: None,
                consumed_experience: cost.experience,
                consumed_currency: cost.currency,
                consumed_guild_contribution: cost.guild_contribution,
                consumed_cultivation_experience: 0,
                date,
            };
            (cost, new_state, audit)
        }
        EntityUpdate::Cultivation(change) => {
            let stored = change.stored;
            let (cost, new_exp) = if change.proposed_level > stored.level {
                let cost = advance_cost(
                    tables,
                    change.mode,
                    stored.level,
                    change.proposed_level,
                    stored.experience,
                    change.proposed_exp,
                );
                (cost, change.proposed_exp.unwrap_or(0))
            } else if change.proposed_level == stored.level {
                let new_exp = change.proposed_exp.unwrap_or(stored.experience);
                (top_up_cost(change.mode, stored.experience, new_exp), new_exp)
            } else {
                // Level regressions are corrections: recorded, never billed.
                (CostResult::zero(), change.proposed_exp.unwrap_or(0))
            };
            let new_state = EntityState { level: change.proposed_level, experience: new_exp };
            let audit = AuditRecord {
                account_id: change.entity.account_id,
                category: change.entity.kind,
                name: change.entity.name.clone(),
                from_level: stored.level,
                to_level: change.proposed_level,
                from_experience: Some(stored.experience),
                to_experience: Some(new_exp),
                consumed_experience: 0,
                consumed_currency: cost.currency,
                consumed_guild_contribution: 0,
                consumed_cultivation_experience: cost.experience,
                date,
            };
            (cost, new_state, audit)
        }
    }
}
