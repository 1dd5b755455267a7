//! `partida-documents` — read models of the business documents the ledger consumes.
//!
//! The ledger engine never mutates these; their owning domain modules create
//! them and the posting adapters read back the minimum needed to compute
//! monetary lines (totals, per-item cost, counterparty identity).

pub mod credit_note;
pub mod invoice;
pub mod party;
pub mod payment;
pub mod payroll;
pub mod store;

pub use credit_note::{CreditNote, CreditNoteItem, CreditNoteKind};
pub use invoice::{ElectronicStatus, Invoice, InvoiceItem};
pub use party::{Customer, Supplier};
pub use payment::{Payment, PaymentMethod};
pub use payroll::PayrollPeriod;
pub use store::{DocumentStore, InMemoryDocuments};
