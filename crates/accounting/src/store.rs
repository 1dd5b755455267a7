use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use partida_core::{EntryId, TenantId, UserId};

use crate::config::{AccountingConfig, ConfigPatch};
use crate::entry::{EntryKind, EntryStatus, JournalEntry, JournalLine, SourceRef};

/// Storage-layer failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An entry already exists for the source reference. Carries the
    /// existing entry so callers can return it as the idempotent result.
    #[error("source document already posted as entry {}", .existing.number)]
    SourceAlreadyPosted { existing: Box<JournalEntry> },

    /// Entry does not exist for this tenant.
    #[error("entry not found")]
    EntryNotFound,

    /// Status transition attempted on a non-draft entry.
    #[error("entry is {current:?}, not draft")]
    EntryNotDraft { current: EntryStatus },

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Entry as handed to the store: everything except the number, which the
/// store allocates from the per-(tenant, period) sequence at insert time.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub id: EntryId,
    pub tenant_id: TenantId,
    pub date: NaiveDate,
    pub period: String,
    pub kind: EntryKind,
    pub description: String,
    pub reference: Option<String>,
    pub source: Option<SourceRef>,
    pub created_by: UserId,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub lines: Vec<JournalLine>,
}

/// Listing filter. `from`/`to` are inclusive entry-date bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub status: Option<EntryStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if let Some(status) = self.status {
            if entry.status != status {
                return false;
            }
        }
        if let Some(from) = self.from {
            if entry.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if entry.date > to {
                return false;
            }
        }
        true
    }
}

/// Persistence boundary of the ledger engine. One implementation per
/// backing store; the journal service is the only caller that writes.
///
/// Contract for `insert_entry` (the single atomic write):
/// - allocates the next number in the entry's `(tenant, period)` sequence
///   and persists entry + lines as one unit; there is no observable state
///   where the entry exists without its lines or its number;
/// - enforces uniqueness of `(tenant, source)`: a second insert for the same
///   source fails with [`StoreError::SourceAlreadyPosted`] carrying the
///   existing entry.
pub trait LedgerStore: Send + Sync {
    fn insert_entry(&self, new: NewEntry) -> Result<JournalEntry, StoreError>;

    /// Full entry, lines included.
    fn entry(&self, tenant_id: TenantId, id: EntryId) -> Option<JournalEntry>;

    fn entry_by_source(&self, tenant_id: TenantId, source: SourceRef) -> Option<JournalEntry>;

    /// Headers only (lines stripped), ordered by date descending.
    fn list_entries(&self, tenant_id: TenantId, filter: &EntryFilter) -> Vec<JournalEntry>;

    /// Flip Draft → Approved. The draft check runs under the store's write
    /// lock so two approvers cannot both win.
    fn record_approval(
        &self,
        tenant_id: TenantId,
        id: EntryId,
        approved_by: UserId,
        approved_at: DateTime<Utc>,
    ) -> Result<JournalEntry, StoreError>;

    fn config(&self, tenant_id: TenantId) -> Option<AccountingConfig>;

    fn upsert_config(
        &self,
        tenant_id: TenantId,
        patch: &ConfigPatch,
    ) -> Result<AccountingConfig, StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn insert_entry(&self, new: NewEntry) -> Result<JournalEntry, StoreError> {
        (**self).insert_entry(new)
    }

    fn entry(&self, tenant_id: TenantId, id: EntryId) -> Option<JournalEntry> {
        (**self).entry(tenant_id, id)
    }

    fn entry_by_source(&self, tenant_id: TenantId, source: SourceRef) -> Option<JournalEntry> {
        (**self).entry_by_source(tenant_id, source)
    }

    fn list_entries(&self, tenant_id: TenantId, filter: &EntryFilter) -> Vec<JournalEntry> {
        (**self).list_entries(tenant_id, filter)
    }

    fn record_approval(
        &self,
        tenant_id: TenantId,
        id: EntryId,
        approved_by: UserId,
        approved_at: DateTime<Utc>,
    ) -> Result<JournalEntry, StoreError> {
        (**self).record_approval(tenant_id, id, approved_by, approved_at)
    }

    fn config(&self, tenant_id: TenantId) -> Option<AccountingConfig> {
        (**self).config(tenant_id)
    }

    fn upsert_config(
        &self,
        tenant_id: TenantId,
        patch: &ConfigPatch,
    ) -> Result<AccountingConfig, StoreError> {
        (**self).upsert_config(tenant_id, patch)
    }
}
