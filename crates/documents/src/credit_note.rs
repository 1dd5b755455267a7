use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use partida_core::{CreditNoteId, InvoiceId, ProductId, TenantId};

/// Whether the note voids the whole invoice or returns part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditNoteKind {
    Total,
    Partial,
}

/// One returned item. `unit_cost` is the inventory cost restored to stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNoteItem {
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
}

/// Credit note read model (return or annulment of an invoice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNote {
    pub id: CreditNoteId,
    pub tenant_id: TenantId,
    pub invoice_id: InvoiceId,
    pub kind: CreditNoteKind,
    pub date: NaiveDate,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub items: Vec<CreditNoteItem>,
}

impl CreditNote {
    /// Total inventory cost of the returned items.
    pub fn returned_cost(&self) -> Decimal {
        self.items.iter().map(|i| i.unit_cost * i.quantity).sum()
    }
}
