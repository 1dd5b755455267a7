//! Invoice postings: sale, annulment reversal, and cost of sales.

use chrono::Utc;

use partida_core::{InvoiceId, TenantId, UserId};
use partida_documents::DocumentStore;

use crate::account::ChartOfAccounts;
use crate::config::AccountRole;
use crate::entry::{EntryKind, JournalEntry, SourceKind, SourceRef, ThirdParty};
use crate::error::{LedgerError, LedgerResult};
use crate::journal::EntryInput;
use crate::store::LedgerStore;

use super::{IntentLine, PostingIntent, PostingService};

impl<S, C, D> PostingService<S, C, D>
where
    S: LedgerStore,
    C: ChartOfAccounts,
    D: DocumentStore,
{
    /// Post the sale entry for an invoice.
    ///
    /// Accounts receivable is debited for the full total (tagged with the
    /// customer); sales revenue is credited for the subtotal and generated
    /// VAT for the tax, with the VAT line omitted when the tax is zero.
    pub fn post_invoice(
        &self,
        invoice_id: InvoiceId,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> LedgerResult<JournalEntry> {
        let invoice = self
            .docs()
            .invoice(tenant_id, invoice_id)
            .ok_or_else(|| LedgerError::not_found("invoice"))?;
        let customer = self
            .docs()
            .customer(tenant_id, invoice.customer_id)
            .ok_or_else(|| LedgerError::not_found("customer"))?;

        let mut wanted = vec![AccountRole::AccountsReceivable, AccountRole::SalesRevenue];
        if !invoice.tax.is_zero() {
            wanted.push(AccountRole::VatGenerated);
        }
        let config = self.config_with(tenant_id, &wanted)?;

        let intent = PostingIntent {
            date: invoice.date,
            kind: EntryKind::Income,
            description: format!("Sale, invoice {invoice_id}"),
            reference: Some(invoice_id.to_string()),
            source: SourceRef::new(SourceKind::Invoice, invoice_id),
            lines: vec![
                IntentLine::debit(AccountRole::AccountsReceivable, invoice.total)
                    .with_third_party(ThirdParty::customer(&customer)),
                IntentLine::credit(AccountRole::SalesRevenue, invoice.subtotal),
                IntentLine::credit(AccountRole::VatGenerated, invoice.tax),
            ],
        };

        let entry = self.post_intent(tenant_id, user_id, &config, intent)?;
        tracing::info!("posted invoice {} as entry {}", invoice_id, entry.number);
        Ok(entry)
    }

    /// Post the reversal entry for an annulled invoice.
    ///
    /// Returns `None` when the invoice never produced an entry (nothing to
    /// reverse). Otherwise a new entry is created whose lines are the exact
    /// debit/credit swap of the original, line-for-line; the original entry
    /// is never mutated.
    pub fn reverse_invoice(
        &self,
        invoice_id: InvoiceId,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> LedgerResult<Option<JournalEntry>> {
        let original = match self
            .journal()
            .entry_for_source(tenant_id, SourceRef::new(SourceKind::Invoice, invoice_id))
        {
            Some(entry) => entry,
            None => return Ok(None),
        };

        let source = SourceRef::new(SourceKind::InvoiceReversal, invoice_id);
        if let Some(existing) = self.journal().entry_for_source(tenant_id, source) {
            return Ok(Some(existing));
        }

        let entry = self.post_lines(
            tenant_id,
            user_id,
            EntryInput {
                date: Utc::now().date_naive(),
                kind: original.kind,
                description: format!("Reversal of entry {}", original.number),
                reference: Some(original.number.clone()),
                source: Some(source),
                lines: original.reversed_lines(),
            },
        )?;
        tracing::info!(
            "reversed invoice {} (entry {} reverses {})",
            invoice_id,
            entry.number,
            original.number
        );
        Ok(Some(entry))
    }

    /// Post cost of sales for an invoice: the summed inventory cost of its
    /// stock-tracked items, debited to cost of sales and credited to
    /// inventory. No entry is created when the computed cost is zero.
    pub fn post_cost_of_sales(
        &self,
        invoice_id: InvoiceId,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> LedgerResult<Option<JournalEntry>> {
        let invoice = self
            .docs()
            .invoice(tenant_id, invoice_id)
            .ok_or_else(|| LedgerError::not_found("invoice"))?;

        let cost = invoice.stock_cost();
        if cost.is_zero() {
            return Ok(None);
        }

        let config = self.config_with(
            tenant_id,
            &[AccountRole::CostOfSales, AccountRole::Inventory],
        )?;

        let intent = PostingIntent {
            date: invoice.date,
            kind: EntryKind::CostSales,
            description: format!("Cost of sales, invoice {invoice_id}"),
            reference: Some(invoice_id.to_string()),
            source: SourceRef::new(SourceKind::CostOfSales, invoice_id),
            lines: vec![
                IntentLine::debit(AccountRole::CostOfSales, cost),
                IntentLine::credit(AccountRole::Inventory, cost),
            ],
        };

        let entry = self.post_intent(tenant_id, user_id, &config, intent)?;
        tracing::info!(
            "posted cost of sales for invoice {} as entry {}",
            invoice_id,
            entry.number
        );
        Ok(Some(entry))
    }
}
