//! JSON file-backed store
//!
//! Write-through persistence collaborator: every mutation lands in memory and
//! is then flushed to a single JSON ledger file. Storage schema concerns stay
//! out of scope; the file is a plain serde snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::memory::{MemoryStore, StoreSnapshot};
use super::{
    AccountId, AuditRecord, ChangeListener, EntityRef, EntityState, ProgressStore, RecordId,
    SpendRecord, SpendSummary, StoreError,
};

/// Current ledger file version for compatibility checking.
const LEDGER_VERSION: u32 = 1;

/// On-disk shape of the ledger.
#[derive(Debug, Serialize, Deserialize)]
struct LedgerFile {
    version: u32,
    #[serde(default)]
    snapshot: StoreSnapshot,
}

/// Default ledger file path.
pub fn default_ledger_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "jadepath", "Jadepath") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("ledger.json");
        path
    } else {
        PathBuf::from("./ledger.json")
    }
}

/// File-backed persistence collaborator.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Open a ledger file, creating an empty store when none exists yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let inner = if path.exists() {
            let data = fs::read_to_string(&path).map_err(|e| StoreError::Io(e.to_string()))?;
            let file: LedgerFile =
                serde_json::from_str(&data).map_err(|e| StoreError::Parse(e.to_string()))?;
            if file.version != LEDGER_VERSION {
                return Err(StoreError::VersionMismatch {
                    expected: LEDGER_VERSION,
                    found: file.version,
                });
            }
            log::info!("Ledger loaded from {:?}", path);
            MemoryStore::from_snapshot(file.snapshot)
        } else {
            log::info!("Creating new ledger at {:?}", path);
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    /// Open the ledger at the default path.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(default_ledger_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed an entity and flush.
    pub fn insert_entity(
        &mut self,
        entity: EntityRef,
        state: EntityState,
    ) -> Result<(), StoreError> {
        self.inner.insert_entity(entity, state);
        self.save()
    }

    /// Register a listener for every mutation going through this store.
    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.inner.subscribe(listener);
    }

    pub fn audits_for_account(&self, account_id: AccountId) -> Vec<&AuditRecord> {
        self.inner.audits_for_account(account_id)
    }

    pub fn spends_for_account(&self, account_id: AccountId) -> Vec<&SpendRecord> {
        self.inner.spends_for_account(account_id)
    }

    pub fn spend_summary(
        &self,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<SpendSummary> {
        self.inner.spend_summary(account_id, from, to)
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let file = LedgerFile { version: LEDGER_VERSION, snapshot: self.inner.snapshot() };
        let json =
            serde_json::to_string_pretty(&file).map_err(|e| StoreError::Parse(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(())
    }
}

impl ProgressStore for JsonStore {
    fn fetch_state(&self, entity: &EntityRef) -> Result<EntityState, StoreError> {
        self.inner.fetch_state(entity)
    }

    fn persist_state(&mut self, entity: &EntityRef, state: EntityState) -> Result<(), StoreError> {
        self.inner.persist_state(entity, state)?;
        self.save()
    }

    fn append_audit(&mut self, record: AuditRecord) -> Result<RecordId, StoreError> {
        let id = self.inner.append_audit(record)?;
        self.save()?;
        Ok(id)
    }

    fn append_spend(&mut self, record: SpendRecord) -> Result<RecordId, StoreError> {
        let id = self.inner.append_spend(record)?;
        self.save()?;
        Ok(id)
    }
}
