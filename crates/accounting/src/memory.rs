use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use partida_core::{EntryId, TenantId, UserId};

use crate::config::{AccountingConfig, ConfigPatch};
use crate::entry::{EntryStatus, JournalEntry, SourceRef};
use crate::store::{EntryFilter, LedgerStore, NewEntry, StoreError};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<(TenantId, EntryId), JournalEntry>,
    by_source: HashMap<(TenantId, SourceRef), EntryId>,
    /// Last allocated sequence per (tenant, period).
    counters: HashMap<(TenantId, String), u32>,
    configs: HashMap<TenantId, AccountingConfig>,
}

/// In-memory ledger store.
///
/// Intended for tests/dev. A single lock guards entries, the source index,
/// and the number counters, so inserts are atomic: number allocation, the
/// source uniqueness check, and the entry+lines write happen as one step.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<Inner>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn insert_entry(&self, new: NewEntry) -> Result<JournalEntry, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        // Uniqueness of (tenant, source) is enforced here, not by the
        // caller's pre-check: concurrent postings both reach this point,
        // only the first one inserts.
        if let Some(source) = new.source {
            if let Some(existing_id) = inner.by_source.get(&(new.tenant_id, source)) {
                let existing = inner
                    .entries
                    .get(&(new.tenant_id, *existing_id))
                    .cloned()
                    .ok_or_else(|| {
                        StoreError::Storage("source index points at missing entry".to_string())
                    })?;
                return Err(StoreError::SourceAlreadyPosted {
                    existing: Box::new(existing),
                });
            }
        }

        let counter = inner
            .counters
            .entry((new.tenant_id, new.period.clone()))
            .or_insert(0);
        *counter += 1;
        let number = format!("{}-{:04}", new.period, counter);

        let entry = JournalEntry {
            id: new.id,
            tenant_id: new.tenant_id,
            number,
            date: new.date,
            period: new.period,
            kind: new.kind,
            description: new.description,
            reference: new.reference,
            status: EntryStatus::Draft,
            total_debit: new.total_debit,
            total_credit: new.total_credit,
            source: new.source,
            created_by: new.created_by,
            approved_by: None,
            approved_at: None,
            lines: new.lines,
        };

        if let Some(source) = entry.source {
            inner.by_source.insert((entry.tenant_id, source), entry.id);
        }
        inner.entries.insert((entry.tenant_id, entry.id), entry.clone());

        Ok(entry)
    }

    fn entry(&self, tenant_id: TenantId, id: EntryId) -> Option<JournalEntry> {
        self.inner.read().ok()?.entries.get(&(tenant_id, id)).cloned()
    }

    fn entry_by_source(&self, tenant_id: TenantId, source: SourceRef) -> Option<JournalEntry> {
        let inner = self.inner.read().ok()?;
        let id = inner.by_source.get(&(tenant_id, source))?;
        inner.entries.get(&(tenant_id, *id)).cloned()
    }

    fn list_entries(&self, tenant_id: TenantId, filter: &EntryFilter) -> Vec<JournalEntry> {
        let inner = match self.inner.read() {
            Ok(i) => i,
            Err(_) => return vec![],
        };

        let mut entries: Vec<JournalEntry> = inner
            .entries
            .iter()
            .filter(|((t, _), e)| *t == tenant_id && filter.matches(e))
            .map(|(_, e)| e.without_lines())
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.number.cmp(&a.number)));
        entries
    }

    fn record_approval(
        &self,
        tenant_id: TenantId,
        id: EntryId,
        approved_by: UserId,
        approved_at: DateTime<Utc>,
    ) -> Result<JournalEntry, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let entry = inner
            .entries
            .get_mut(&(tenant_id, id))
            .ok_or(StoreError::EntryNotFound)?;

        if entry.status != EntryStatus::Draft {
            return Err(StoreError::EntryNotDraft {
                current: entry.status,
            });
        }

        entry.status = EntryStatus::Approved;
        entry.approved_by = Some(approved_by);
        entry.approved_at = Some(approved_at);
        Ok(entry.clone())
    }

    fn config(&self, tenant_id: TenantId) -> Option<AccountingConfig> {
        self.inner.read().ok()?.configs.get(&tenant_id).cloned()
    }

    fn upsert_config(
        &self,
        tenant_id: TenantId,
        patch: &ConfigPatch,
    ) -> Result<AccountingConfig, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let config = inner
            .configs
            .entry(tenant_id)
            .or_insert_with(|| AccountingConfig::empty(tenant_id));
        config.apply(patch);
        Ok(config.clone())
    }
}
