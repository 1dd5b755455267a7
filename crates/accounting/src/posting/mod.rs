//! Source integration adapters.
//!
//! One adapter per business-event family (invoice, payment, credit note,
//! inventory purchase, cost of sales, payroll). Every adapter follows the
//! same shape: load the source document, check idempotency, resolve the
//! tenant's accounting configuration, build a balanced posting intent, and
//! hand it to the journal service tagged with the source identity.

mod credit_note;
mod inventory;
mod invoice;
mod payment;
mod payroll;

pub use credit_note::CreditNotePosting;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use partida_core::{TenantId, UserId};
use partida_documents::{Customer, DocumentStore, Supplier};

use crate::account::ChartOfAccounts;
use crate::config::{AccountRole, AccountingConfig};
use crate::entry::{EntryKind, EntryStatus, JournalEntry, JournalLine, SourceRef, ThirdParty};
use crate::error::{LedgerError, LedgerResult};
use crate::journal::{EntryInput, JournalService};
use crate::store::LedgerStore;

/// Which side of the entry an intent line lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Debit,
    Credit,
}

/// One movement expressed against a semantic role instead of a concrete
/// account. Resolution maps roles through the tenant configuration and
/// drops zero-amount lines, so adapters never emit zero-amount placeholders.
#[derive(Debug, Clone)]
pub struct IntentLine {
    pub role: AccountRole,
    pub direction: Direction,
    pub amount: Decimal,
    pub third_party: Option<ThirdParty>,
}

impl IntentLine {
    pub fn debit(role: AccountRole, amount: Decimal) -> Self {
        Self {
            role,
            direction: Direction::Debit,
            amount,
            third_party: None,
        }
    }

    pub fn credit(role: AccountRole, amount: Decimal) -> Self {
        Self {
            role,
            direction: Direction::Credit,
            amount,
            third_party: None,
        }
    }

    pub fn with_third_party(mut self, third_party: ThirdParty) -> Self {
        self.third_party = Some(third_party);
        self
    }
}

/// A business event reduced to the lines it should post.
#[derive(Debug, Clone)]
pub struct PostingIntent {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub description: String,
    pub reference: Option<String>,
    pub source: SourceRef,
    pub lines: Vec<IntentLine>,
}

impl ThirdParty {
    pub fn customer(customer: &Customer) -> Self {
        Self {
            id: customer.id.into(),
            name: customer.name.clone(),
            tax_id: customer.tax_id.clone(),
        }
    }

    pub fn supplier(supplier: &Supplier) -> Self {
        Self {
            id: supplier.id.into(),
            name: supplier.name.clone(),
            tax_id: supplier.tax_id.clone(),
        }
    }
}

/// Posting facade over the journal service plus the read-only collaborators
/// (chart of accounts, business documents).
#[derive(Debug)]
pub struct PostingService<S, C, D> {
    journal: JournalService<S>,
    chart: C,
    docs: D,
}

impl<S, C, D> PostingService<S, C, D>
where
    S: LedgerStore,
    C: ChartOfAccounts,
    D: DocumentStore,
{
    pub fn new(store: S, chart: C, docs: D) -> Self {
        Self {
            journal: JournalService::new(store),
            chart,
            docs,
        }
    }

    /// The underlying journal service (direct entry creation, approval,
    /// listing, configuration).
    pub fn journal(&self) -> &JournalService<S> {
        &self.journal
    }

    pub(crate) fn chart(&self) -> &C {
        &self.chart
    }

    pub(crate) fn docs(&self) -> &D {
        &self.docs
    }

    /// Tenant configuration with every role in `wanted` set, or a
    /// configuration error naming all the gaps at once.
    pub(crate) fn config_with(
        &self,
        tenant_id: TenantId,
        wanted: &[AccountRole],
    ) -> LedgerResult<AccountingConfig> {
        match self.journal.config(tenant_id) {
            Some(config) => {
                let missing = config.missing_of(wanted);
                if missing.is_empty() {
                    Ok(config)
                } else {
                    Err(LedgerError::missing_roles(missing))
                }
            }
            None => Err(LedgerError::missing_roles(wanted.to_vec())),
        }
    }

    /// Resolve an intent against the configuration and post it.
    ///
    /// Returns the existing entry unchanged when the source was already
    /// posted (pre-check here, storage uniqueness as the backstop).
    pub(crate) fn post_intent(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        config: &AccountingConfig,
        intent: PostingIntent,
    ) -> LedgerResult<JournalEntry> {
        if let Some(existing) = self.journal.entry_for_source(tenant_id, intent.source) {
            return Ok(existing);
        }

        let mut lines = Vec::with_capacity(intent.lines.len());
        for line in &intent.lines {
            if line.amount.is_zero() {
                continue;
            }
            let account_id = config
                .account_for(line.role)
                .ok_or_else(|| LedgerError::missing_roles(vec![line.role]))?;
            let mut journal_line = match line.direction {
                Direction::Debit => JournalLine::debit(account_id, line.amount),
                Direction::Credit => JournalLine::credit(account_id, line.amount),
            };
            journal_line.third_party = line.third_party.clone();
            lines.push(journal_line);
        }

        self.post_lines(
            tenant_id,
            user_id,
            EntryInput {
                date: intent.date,
                kind: intent.kind,
                description: intent.description,
                reference: intent.reference,
                source: Some(intent.source),
                lines,
            },
        )
    }

    /// Create and approve an adapter entry from already-resolved lines.
    /// Every adapter-posted entry passes the approval balance gate.
    pub(crate) fn post_lines(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        input: EntryInput,
    ) -> LedgerResult<JournalEntry> {
        let entry = self.journal.create_entry(tenant_id, user_id, input)?;
        if entry.status == EntryStatus::Draft {
            self.journal.approve_entry(tenant_id, entry.id, user_id)
        } else {
            // Idempotent replay of an already-approved posting.
            Ok(entry)
        }
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use partida_core::{AccountId, CustomerId, InvoiceId, TenantId};
    use partida_documents::{
        Customer, ElectronicStatus, InMemoryDocuments, Invoice, InvoiceItem,
    };

    use crate::account::{Account, AccountKind, InMemoryChart};
    use crate::config::ConfigPatch;
    use crate::memory::InMemoryLedgerStore;

    use super::PostingService;

    pub type TestPosting =
        PostingService<Arc<InMemoryLedgerStore>, Arc<InMemoryChart>, Arc<InMemoryDocuments>>;

    pub struct Fixture {
        pub posting: TestPosting,
        pub chart: Arc<InMemoryChart>,
        pub docs: Arc<InMemoryDocuments>,
        pub tenant: TenantId,
        pub accounts: ConfiguredAccounts,
    }

    pub struct ConfiguredAccounts {
        pub cash: AccountId,
        pub bank: AccountId,
        pub accounts_receivable: AccountId,
        pub accounts_payable: AccountId,
        pub inventory: AccountId,
        pub sales_revenue: AccountId,
        pub vat_generated: AccountId,
        pub cost_of_sales: AccountId,
    }

    pub fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    /// Store + chart + documents with a fully mapped configuration.
    pub fn fixture() -> Fixture {
        let tenant = TenantId::new();
        let chart = Arc::new(InMemoryChart::new());
        let docs = Arc::new(InMemoryDocuments::new());
        let posting = PostingService::new(
            Arc::new(InMemoryLedgerStore::new()),
            Arc::clone(&chart),
            Arc::clone(&docs),
        );

        let accounts = ConfiguredAccounts {
            cash: AccountId::new(),
            bank: AccountId::new(),
            accounts_receivable: AccountId::new(),
            accounts_payable: AccountId::new(),
            inventory: AccountId::new(),
            sales_revenue: AccountId::new(),
            vat_generated: AccountId::new(),
            cost_of_sales: AccountId::new(),
        };
        chart.insert(tenant, Account::new(accounts.cash, "1105", "Caja", AccountKind::Asset));
        chart.insert(tenant, Account::new(accounts.bank, "1110", "Bancos", AccountKind::Asset));
        chart.insert(
            tenant,
            Account::new(accounts.accounts_receivable, "1305", "Clientes", AccountKind::Asset)
                .with_third_party(),
        );
        chart.insert(
            tenant,
            Account::new(accounts.accounts_payable, "2205", "Proveedores", AccountKind::Liability)
                .with_third_party(),
        );
        chart.insert(
            tenant,
            Account::new(accounts.inventory, "1435", "Inventarios", AccountKind::Asset),
        );
        chart.insert(
            tenant,
            Account::new(accounts.sales_revenue, "4135", "Ventas", AccountKind::Income),
        );
        chart.insert(
            tenant,
            Account::new(accounts.vat_generated, "2408", "IVA generado", AccountKind::Liability),
        );
        chart.insert(
            tenant,
            Account::new(accounts.cost_of_sales, "6135", "Costo de ventas", AccountKind::Cost),
        );

        posting
            .journal()
            .upsert_config(
                tenant,
                &ConfigPatch {
                    cash: Some(accounts.cash),
                    bank: Some(accounts.bank),
                    accounts_receivable: Some(accounts.accounts_receivable),
                    accounts_payable: Some(accounts.accounts_payable),
                    inventory: Some(accounts.inventory),
                    sales_revenue: Some(accounts.sales_revenue),
                    vat_generated: Some(accounts.vat_generated),
                    cost_of_sales: Some(accounts.cost_of_sales),
                    ..ConfigPatch::default()
                },
            )
            .unwrap();

        Fixture {
            posting,
            chart,
            docs,
            tenant,
            accounts,
        }
    }

    impl Fixture {
        /// Same chart and documents, fresh store: no accounting
        /// configuration exists for any tenant.
        pub fn unconfigured(&self) -> TestPosting {
            PostingService::new(
                Arc::new(InMemoryLedgerStore::new()),
                Arc::clone(&self.chart),
                Arc::clone(&self.docs),
            )
        }

        pub fn seed_customer(&self, name: &str) -> CustomerId {
            let id = CustomerId::new();
            self.docs.put_customer(
                self.tenant,
                Customer {
                    id,
                    name: name.to_string(),
                    tax_id: Some("900123456-7".to_string()),
                },
            );
            id
        }

        pub fn seed_invoice(
            &self,
            customer_id: CustomerId,
            subtotal: Decimal,
            tax: Decimal,
        ) -> InvoiceId {
            self.seed_invoice_with_items(customer_id, subtotal, tax, vec![])
        }

        pub fn seed_invoice_with_items(
            &self,
            customer_id: CustomerId,
            subtotal: Decimal,
            tax: Decimal,
            items: Vec<InvoiceItem>,
        ) -> InvoiceId {
            let id = InvoiceId::new();
            self.docs.put_invoice(Invoice {
                id,
                tenant_id: self.tenant,
                customer_id,
                date: test_date(),
                subtotal,
                tax,
                total: subtotal + tax,
                electronic_status: ElectronicStatus::Accepted,
                items,
            });
            id
        }

        pub fn stock_item(&self, unit_cost: Decimal, quantity: Decimal) -> InvoiceItem {
            InvoiceItem {
                product_id: partida_core::ProductId::new(),
                quantity,
                unit_price: dec!(0),
                unit_cost,
                tracks_stock: true,
            }
        }
    }
}
