//! Ledger error taxonomy.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::AccountRole;
use crate::entry::EntryStatus;
use crate::store::StoreError;

/// Result type used across the ledger engine.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures surfaced by the journal service and the posting adapters.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A required semantic account role is unset for the tenant. The operator
    /// must complete the account mapping before retrying.
    #[error("accounting configuration incomplete: missing {}", format_roles(.roles))]
    MissingConfiguration { roles: Vec<AccountRole> },

    /// Source document or referenced entry does not exist, or belongs to a
    /// different tenant.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Debits and credits differ beyond tolerance. Raised only at approval.
    /// Indicates a bug in an adapter's line construction; do not blind-retry.
    #[error("unbalanced entry: debits and credits differ by {difference}")]
    Unbalanced { difference: Decimal },

    /// Approval attempted on a non-draft entry.
    #[error("entry is {current:?}, expected draft")]
    InvalidState { current: EntryStatus },

    /// An entry must carry at least one line.
    #[error("entry has no lines")]
    EmptyEntry,

    /// The payroll fallback scan found no matching account in the chart.
    #[error("no account matches {description}")]
    MissingAccount { description: String },

    /// A credit note was raised against an invoice that was never transmitted.
    #[error("invoice is not electronically sent or accepted")]
    InvoiceNotSent,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn missing_roles(roles: Vec<AccountRole>) -> Self {
        Self::MissingConfiguration { roles }
    }
}

fn format_roles(roles: &[AccountRole]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
