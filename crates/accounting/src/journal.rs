//! Journal service: creates, numbers, approves, and retrieves entries.
//!
//! The only component allowed to write ledger rows. Draft entries may be
//! transiently unbalanced; the double-entry invariant is enforced once, at
//! approval.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use partida_core::{EntryId, TenantId, UserId};

use crate::account::{Account, ChartOfAccounts};
use crate::config::{AccountingConfig, AccountRole, ConfigPatch, ValidationReport};
use crate::entry::{
    line_totals, period_of, EntryKind, EntryStatus, JournalEntry, JournalLine, SourceRef,
    BALANCE_TOLERANCE,
};
use crate::error::{LedgerError, LedgerResult};
use crate::store::{EntryFilter, LedgerStore, NewEntry, StoreError};

/// Caller-supplied half of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInput {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub description: String,
    pub reference: Option<String>,
    /// Originating business document, when the entry is adapter-posted.
    /// Persisted with the entry so the store's uniqueness constraint can
    /// act as the idempotency backstop.
    pub source: Option<SourceRef>,
    pub lines: Vec<JournalLine>,
}

/// Journal entry lifecycle and retrieval, generic over the backing store.
#[derive(Debug)]
pub struct JournalService<S> {
    store: S,
}

impl<S: LedgerStore> JournalService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a draft entry.
    ///
    /// Lines must be non-empty; no balance check runs here. The store
    /// allocates the `{period}-{seq:04}` number and persists entry + lines
    /// atomically. When the input carries a source that was already posted,
    /// the existing entry is returned unchanged (idempotent no-op).
    pub fn create_entry(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        input: EntryInput,
    ) -> LedgerResult<JournalEntry> {
        if input.lines.is_empty() {
            return Err(LedgerError::EmptyEntry);
        }

        let (total_debit, total_credit) = line_totals(&input.lines);
        let period = period_of(input.date);

        let new = NewEntry {
            id: EntryId::new(),
            tenant_id,
            date: input.date,
            period,
            kind: input.kind,
            description: input.description,
            reference: input.reference,
            source: input.source,
            created_by: user_id,
            total_debit,
            total_credit,
            lines: input.lines,
        };

        match self.store.insert_entry(new) {
            Ok(entry) => {
                tracing::info!(
                    "created journal entry {} for tenant {} ({} dr / {} cr)",
                    entry.number,
                    tenant_id,
                    entry.total_debit,
                    entry.total_credit
                );
                Ok(entry)
            }
            Err(StoreError::SourceAlreadyPosted { existing }) => {
                tracing::info!(
                    "source already posted as entry {}, returning existing",
                    existing.number
                );
                Ok(*existing)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Approve a draft entry.
    ///
    /// The single point where the fundamental invariant is enforced: the
    /// entry's debit/credit totals must agree within [`BALANCE_TOLERANCE`].
    pub fn approve_entry(
        &self,
        tenant_id: TenantId,
        entry_id: EntryId,
        user_id: UserId,
    ) -> LedgerResult<JournalEntry> {
        let entry = self
            .store
            .entry(tenant_id, entry_id)
            .ok_or_else(|| LedgerError::not_found("entry"))?;

        if entry.status != EntryStatus::Draft {
            return Err(LedgerError::InvalidState {
                current: entry.status,
            });
        }

        // Lines are immutable once written, so the imbalance computed here
        // cannot go stale between the check and the status flip below.
        let difference = entry.imbalance();
        if difference > BALANCE_TOLERANCE {
            return Err(LedgerError::Unbalanced { difference });
        }

        let approved = self
            .store
            .record_approval(tenant_id, entry_id, user_id, Utc::now())
            .map_err(|e| match e {
                StoreError::EntryNotFound => LedgerError::not_found("entry"),
                StoreError::EntryNotDraft { current } => LedgerError::InvalidState { current },
                other => other.into(),
            })?;

        tracing::info!(
            "approved journal entry {} for tenant {}",
            approved.number,
            tenant_id
        );
        Ok(approved)
    }

    /// Entry headers, date descending. Line detail is omitted; fetch a
    /// single entry for drill-down.
    pub fn list_entries(&self, tenant_id: TenantId, filter: &EntryFilter) -> Vec<JournalEntry> {
        self.store.list_entries(tenant_id, filter)
    }

    /// Full entry including lines, or `None` when absent / other-tenant.
    pub fn get_entry(&self, tenant_id: TenantId, entry_id: EntryId) -> Option<JournalEntry> {
        self.store.entry(tenant_id, entry_id)
    }

    /// Entry posted for a source document, if any.
    pub fn entry_for_source(&self, tenant_id: TenantId, source: SourceRef) -> Option<JournalEntry> {
        self.store.entry_by_source(tenant_id, source)
    }

    // --- accounting configuration -------------------------------------------------

    pub fn config(&self, tenant_id: TenantId) -> Option<AccountingConfig> {
        self.store.config(tenant_id)
    }

    /// Create or merge the tenant's role mapping.
    pub fn upsert_config(
        &self,
        tenant_id: TenantId,
        patch: &ConfigPatch,
    ) -> LedgerResult<AccountingConfig> {
        Ok(self.store.upsert_config(tenant_id, patch)?)
    }

    /// Completeness check against the required minimum roles.
    pub fn validate_config(&self, tenant_id: TenantId) -> ValidationReport {
        ValidationReport::for_config(self.store.config(tenant_id).as_ref())
    }

    /// Single-role lookup.
    pub fn resolve_role(&self, tenant_id: TenantId, role: AccountRole) -> Option<partida_core::AccountId> {
        self.store.config(tenant_id)?.account_for(role)
    }

    /// Set roles with their accounts resolved against the chart.
    pub fn config_resolved<C: ChartOfAccounts>(
        &self,
        tenant_id: TenantId,
        chart: &C,
    ) -> Option<Vec<(AccountRole, Account)>> {
        Some(self.store.config(tenant_id)?.resolve(chart))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use partida_core::AccountId;

    use crate::entry::SourceKind;
    use crate::memory::InMemoryLedgerStore;

    fn service() -> JournalService<InMemoryLedgerStore> {
        JournalService::new(InMemoryLedgerStore::new())
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn balanced_input() -> EntryInput {
        EntryInput {
            date: test_date(),
            kind: EntryKind::Journal,
            description: "opening balances".to_string(),
            reference: None,
            source: None,
            lines: vec![
                JournalLine::debit(AccountId::new(), dec!(250.00)),
                JournalLine::credit(AccountId::new(), dec!(250.00)),
            ],
        }
    }

    #[test]
    fn create_entry_rejects_empty_lines() {
        let service = service();
        let input = EntryInput {
            lines: vec![],
            ..balanced_input()
        };
        let err = service
            .create_entry(TenantId::new(), UserId::new(), input)
            .unwrap_err();
        assert!(matches!(err, LedgerError::EmptyEntry));
    }

    #[test]
    fn create_entry_caches_totals_and_derives_period() {
        let service = service();
        let entry = service
            .create_entry(TenantId::new(), UserId::new(), balanced_input())
            .unwrap();

        assert_eq!(entry.period, "2025-03");
        assert_eq!(entry.number, "2025-03-0001");
        assert_eq!(entry.total_debit, dec!(250.00));
        assert_eq!(entry.total_credit, dec!(250.00));
        assert_eq!(entry.status, EntryStatus::Draft);
    }

    #[test]
    fn unbalanced_draft_is_created_but_not_approvable() {
        let service = service();
        let tenant = TenantId::new();
        let user = UserId::new();

        let input = EntryInput {
            lines: vec![
                JournalLine::debit(AccountId::new(), dec!(100.00)),
                JournalLine::credit(AccountId::new(), dec!(80.00)),
            ],
            ..balanced_input()
        };
        // Drafts may be transiently unbalanced.
        let entry = service.create_entry(tenant, user, input).unwrap();

        let err = service.approve_entry(tenant, entry.id, user).unwrap_err();
        match err {
            LedgerError::Unbalanced { difference } => assert_eq!(difference, dec!(20.00)),
            other => panic!("expected Unbalanced, got {other:?}"),
        }
    }

    #[test]
    fn approval_within_tolerance_succeeds_and_records_approver() {
        let service = service();
        let tenant = TenantId::new();
        let creator = UserId::new();
        let approver = UserId::new();

        let input = EntryInput {
            lines: vec![
                JournalLine::debit(AccountId::new(), dec!(100.00)),
                JournalLine::credit(AccountId::new(), dec!(99.99)),
            ],
            ..balanced_input()
        };
        let entry = service.create_entry(tenant, creator, input).unwrap();
        let approved = service.approve_entry(tenant, entry.id, approver).unwrap();

        assert_eq!(approved.status, EntryStatus::Approved);
        assert_eq!(approved.approved_by, Some(approver));
        assert!(approved.approved_at.is_some());
    }

    #[test]
    fn approving_twice_is_a_state_error() {
        let service = service();
        let tenant = TenantId::new();
        let user = UserId::new();

        let entry = service.create_entry(tenant, user, balanced_input()).unwrap();
        service.approve_entry(tenant, entry.id, user).unwrap();

        let err = service.approve_entry(tenant, entry.id, user).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidState {
                current: EntryStatus::Approved
            }
        ));
    }

    #[test]
    fn approving_foreign_tenant_entry_is_not_found() {
        let service = service();
        let entry = service
            .create_entry(TenantId::new(), UserId::new(), balanced_input())
            .unwrap();

        let err = service
            .approve_entry(TenantId::new(), entry.id, UserId::new())
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[test]
    fn same_source_posts_once() {
        let service = service();
        let tenant = TenantId::new();
        let user = UserId::new();
        let source = SourceRef::new(SourceKind::Invoice, uuid::Uuid::now_v7());

        let input = EntryInput {
            source: Some(source),
            ..balanced_input()
        };
        let first = service.create_entry(tenant, user, input.clone()).unwrap();
        let second = service.create_entry(tenant, user, input).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(service.list_entries(tenant, &EntryFilter::default()).len(), 1);
    }

    #[test]
    fn list_filters_by_status_and_date_range() {
        let service = service();
        let tenant = TenantId::new();
        let user = UserId::new();

        let draft = service.create_entry(tenant, user, balanced_input()).unwrap();
        let approved = service.create_entry(tenant, user, balanced_input()).unwrap();
        service.approve_entry(tenant, approved.id, user).unwrap();

        let drafts = service.list_entries(
            tenant,
            &EntryFilter {
                status: Some(EntryStatus::Draft),
                ..EntryFilter::default()
            },
        );
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, draft.id);

        let out_of_range = service.list_entries(
            tenant,
            &EntryFilter {
                from: Some(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()),
                ..EntryFilter::default()
            },
        );
        assert!(out_of_range.is_empty());
    }

    #[test]
    fn config_upsert_validate_and_resolve() {
        let service = service();
        let tenant = TenantId::new();

        assert!(service.config(tenant).is_none());
        let report = service.validate_config(tenant);
        assert!(!report.is_valid);

        let cash = AccountId::new();
        service
            .upsert_config(
                tenant,
                &ConfigPatch {
                    cash: Some(cash),
                    ..ConfigPatch::default()
                },
            )
            .unwrap();

        assert_eq!(service.resolve_role(tenant, AccountRole::Cash), Some(cash));
        assert_eq!(service.resolve_role(tenant, AccountRole::Bank), None);
    }
}
