use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use partida_core::{CreditNoteId, CustomerId, InvoiceId, PaymentId, PayrollPeriodId, SupplierId, TenantId};

use crate::credit_note::CreditNote;
use crate::invoice::Invoice;
use crate::party::{Customer, Supplier};
use crate::payment::Payment;
use crate::payroll::PayrollPeriod;

/// Tenant-isolated, read-only access to the business documents the posting
/// adapters consume. The owning domain modules write these; the ledger
/// engine only reads.
pub trait DocumentStore: Send + Sync {
    fn invoice(&self, tenant_id: TenantId, id: InvoiceId) -> Option<Invoice>;
    fn customer(&self, tenant_id: TenantId, id: CustomerId) -> Option<Customer>;
    fn supplier(&self, tenant_id: TenantId, id: SupplierId) -> Option<Supplier>;
    fn payment(&self, tenant_id: TenantId, id: PaymentId) -> Option<Payment>;
    fn credit_note(&self, tenant_id: TenantId, id: CreditNoteId) -> Option<CreditNote>;
    fn payroll_period(&self, tenant_id: TenantId, id: PayrollPeriodId) -> Option<PayrollPeriod>;
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn invoice(&self, tenant_id: TenantId, id: InvoiceId) -> Option<Invoice> {
        (**self).invoice(tenant_id, id)
    }

    fn customer(&self, tenant_id: TenantId, id: CustomerId) -> Option<Customer> {
        (**self).customer(tenant_id, id)
    }

    fn supplier(&self, tenant_id: TenantId, id: SupplierId) -> Option<Supplier> {
        (**self).supplier(tenant_id, id)
    }

    fn payment(&self, tenant_id: TenantId, id: PaymentId) -> Option<Payment> {
        (**self).payment(tenant_id, id)
    }

    fn credit_note(&self, tenant_id: TenantId, id: CreditNoteId) -> Option<CreditNote> {
        (**self).credit_note(tenant_id, id)
    }

    fn payroll_period(&self, tenant_id: TenantId, id: PayrollPeriodId) -> Option<PayrollPeriod> {
        (**self).payroll_period(tenant_id, id)
    }
}

/// In-memory document store for tests/dev.
///
/// Not optimized for performance; lookups clone.
#[derive(Debug, Default)]
pub struct InMemoryDocuments {
    invoices: RwLock<HashMap<(TenantId, InvoiceId), Invoice>>,
    customers: RwLock<HashMap<(TenantId, CustomerId), Customer>>,
    suppliers: RwLock<HashMap<(TenantId, SupplierId), Supplier>>,
    payments: RwLock<HashMap<(TenantId, PaymentId), Payment>>,
    credit_notes: RwLock<HashMap<(TenantId, CreditNoteId), CreditNote>>,
    payroll_periods: RwLock<HashMap<(TenantId, PayrollPeriodId), PayrollPeriod>>,
}

impl InMemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_invoice(&self, invoice: Invoice) {
        if let Ok(mut map) = self.invoices.write() {
            map.insert((invoice.tenant_id, invoice.id), invoice);
        }
    }

    pub fn put_customer(&self, tenant_id: TenantId, customer: Customer) {
        if let Ok(mut map) = self.customers.write() {
            map.insert((tenant_id, customer.id), customer);
        }
    }

    pub fn put_supplier(&self, tenant_id: TenantId, supplier: Supplier) {
        if let Ok(mut map) = self.suppliers.write() {
            map.insert((tenant_id, supplier.id), supplier);
        }
    }

    pub fn put_payment(&self, payment: Payment) {
        if let Ok(mut map) = self.payments.write() {
            map.insert((payment.tenant_id, payment.id), payment);
        }
    }

    pub fn put_credit_note(&self, note: CreditNote) {
        if let Ok(mut map) = self.credit_notes.write() {
            map.insert((note.tenant_id, note.id), note);
        }
    }

    pub fn put_payroll_period(&self, period: PayrollPeriod) {
        if let Ok(mut map) = self.payroll_periods.write() {
            map.insert((period.tenant_id, period.id), period);
        }
    }
}

impl DocumentStore for InMemoryDocuments {
    fn invoice(&self, tenant_id: TenantId, id: InvoiceId) -> Option<Invoice> {
        self.invoices.read().ok()?.get(&(tenant_id, id)).cloned()
    }

    fn customer(&self, tenant_id: TenantId, id: CustomerId) -> Option<Customer> {
        self.customers.read().ok()?.get(&(tenant_id, id)).cloned()
    }

    fn supplier(&self, tenant_id: TenantId, id: SupplierId) -> Option<Supplier> {
        self.suppliers.read().ok()?.get(&(tenant_id, id)).cloned()
    }

    fn payment(&self, tenant_id: TenantId, id: PaymentId) -> Option<Payment> {
        self.payments.read().ok()?.get(&(tenant_id, id)).cloned()
    }

    fn credit_note(&self, tenant_id: TenantId, id: CreditNoteId) -> Option<CreditNote> {
        self.credit_notes.read().ok()?.get(&(tenant_id, id)).cloned()
    }

    fn payroll_period(&self, tenant_id: TenantId, id: PayrollPeriodId) -> Option<PayrollPeriod> {
        self.payroll_periods.read().ok()?.get(&(tenant_id, id)).cloned()
    }
}
