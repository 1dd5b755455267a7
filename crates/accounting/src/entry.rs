use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use partida_core::{AccountId, EntryId, TenantId, UserId};

/// Largest tolerated |total debit - total credit| for an approved entry.
/// Absorbs rounding from per-line tax/cost arithmetic.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2); // 0.01

/// Entry lifecycle. One-way: a draft becomes approved, nothing else.
/// Corrections are new reversal entries, never in-place edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Draft,
    Approved,
}

/// Business classification of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Income,
    Expense,
    CostSales,
    Journal,
    Disbursement,
    Payroll,
}

/// Family of business document an entry was posted from.
///
/// Reversal kinds are distinct from their originals so that a reversal and
/// the entry it reverses never collide on the idempotency key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Invoice,
    InvoiceReversal,
    Payment,
    CostOfSales,
    Purchase,
    CreditNote,
    CreditNoteCostReversal,
    Payroll,
}

/// Identity of the originating business document.
///
/// `(tenant_id, SourceRef)` is the idempotency key: at most one entry exists
/// per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub kind: SourceKind,
    pub doc_id: Uuid,
}

impl SourceRef {
    pub fn new(kind: SourceKind, doc_id: impl Into<Uuid>) -> Self {
        Self {
            kind,
            doc_id: doc_id.into(),
        }
    }
}

/// Counterparty identity attached to a line, for accounts that track
/// receivables/payables per third party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdParty {
    pub id: Uuid,
    pub name: String,
    pub tax_id: Option<String>,
}

/// Single debit or credit movement against one account.
///
/// Exactly one side is non-zero by convention. Lines are created atomically
/// with their entry and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    pub account_id: AccountId,
    pub debit: Decimal,
    pub credit: Decimal,
    pub third_party: Option<ThirdParty>,
}

impl JournalLine {
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            third_party: None,
        }
    }

    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            third_party: None,
        }
    }

    pub fn with_third_party(mut self, third_party: ThirdParty) -> Self {
        self.third_party = Some(third_party);
        self
    }

    /// Same account and counterparty, debit and credit swapped.
    pub fn reversed(&self) -> Self {
        Self {
            account_id: self.account_id,
            debit: self.credit,
            credit: self.debit,
            third_party: self.third_party.clone(),
        }
    }
}

/// One balanced accounting transaction composed of two or more lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    pub tenant_id: TenantId,
    /// `{period}-{seq:04}`, e.g. `2025-03-0001`. Assigned by the store.
    pub number: String,
    pub date: NaiveDate,
    /// Calendar month bucket, `YYYY-MM`.
    pub period: String,
    pub kind: EntryKind,
    pub description: String,
    pub reference: Option<String>,
    pub status: EntryStatus,
    /// Cached line sums; always equal to the sums over `lines`.
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub source: Option<SourceRef>,
    pub created_by: UserId,
    pub approved_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    pub fn imbalance(&self) -> Decimal {
        (self.total_debit - self.total_credit).abs()
    }

    pub fn is_balanced(&self) -> bool {
        self.imbalance() <= BALANCE_TOLERANCE
    }

    /// Debit/credit swap of every line, line-for-line, for reversal entries.
    pub fn reversed_lines(&self) -> Vec<JournalLine> {
        self.lines.iter().map(JournalLine::reversed).collect()
    }

    /// Header-only copy for listings (lines are the heavier on-demand fetch).
    pub fn without_lines(&self) -> Self {
        Self {
            lines: Vec::new(),
            ..self.clone()
        }
    }
}

/// Derive the accounting period (`YYYY-MM`) an entry date falls into.
pub fn period_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Sum the debit and credit sides of a set of lines.
pub fn line_totals(lines: &[JournalLine]) -> (Decimal, Decimal) {
    lines.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(debit, credit), line| (debit + line.debit, credit + line.credit),
    )
}
