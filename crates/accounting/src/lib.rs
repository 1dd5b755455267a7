//! Accounting module (double-entry ledger engine).
//!
//! Turns business events into balanced journal entries: per-tenant role
//! configuration, tamper-evident sequential numbering per period, a
//! draft-then-approve lifecycle, and one posting adapter per business-event
//! family. Storage sits behind [`store::LedgerStore`]; everything else is
//! domain logic.

pub mod account;
pub mod config;
pub mod entry;
pub mod error;
pub mod journal;
pub mod memory;
pub mod posting;
pub mod store;

pub use account::{Account, AccountKind, ChartOfAccounts, InMemoryChart, NormalSide};
pub use config::{AccountRole, AccountingConfig, ConfigPatch, ValidationReport, REQUIRED_ROLES};
pub use entry::{
    EntryKind, EntryStatus, JournalEntry, JournalLine, SourceKind, SourceRef, ThirdParty,
    BALANCE_TOLERANCE,
};
pub use error::{LedgerError, LedgerResult};
pub use journal::{EntryInput, JournalService};
pub use memory::InMemoryLedgerStore;
pub use posting::{CreditNotePosting, PostingService};
pub use store::{EntryFilter, LedgerStore, NewEntry, StoreError};
