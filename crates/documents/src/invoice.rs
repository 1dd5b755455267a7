use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use partida_core::{CustomerId, InvoiceId, ProductId, TenantId};

/// Electronic invoicing status as reported by the tax authority pipeline.
///
/// Credit notes may only be raised against invoices that were actually
/// transmitted (`Sent`) or acknowledged (`Accepted`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectronicStatus {
    None,
    Pending,
    Sent,
    Accepted,
    Rejected,
}

impl ElectronicStatus {
    /// Whether the invoice can legally receive a credit note.
    pub fn accepts_credit_note(self) -> bool {
        matches!(self, Self::Sent | Self::Accepted)
    }
}

/// One invoice item. `unit_cost` is the inventory cost used for cost-of-sales;
/// items that do not track stock contribute nothing to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub unit_cost: Decimal,
    pub tracks_stock: bool,
}

/// Sales invoice read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub tenant_id: TenantId,
    pub customer_id: CustomerId,
    pub date: NaiveDate,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub electronic_status: ElectronicStatus,
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    /// Total inventory cost of the stock-tracked items (cost-of-sales base).
    pub fn stock_cost(&self) -> Decimal {
        self.items
            .iter()
            .filter(|i| i.tracks_stock)
            .map(|i| i.unit_cost * i.quantity)
            .sum()
    }
}
