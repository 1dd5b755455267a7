//! Credit note postings: revenue reversal and inventory cost restoration.
//!
//! Accounting here is best-effort relative to the business document: the
//! lenient wrapper catches configuration gaps and reports them instead of
//! failing the surrounding transaction, so a return can complete even for a
//! tenant that never finished accounting onboarding.

use partida_core::{CreditNoteId, TenantId, UserId, WarehouseId};
use partida_documents::DocumentStore;

use crate::account::ChartOfAccounts;
use crate::config::AccountRole;
use crate::entry::{EntryKind, JournalEntry, SourceKind, SourceRef, ThirdParty};
use crate::error::{LedgerError, LedgerResult};
use crate::store::LedgerStore;

use super::{IntentLine, PostingIntent, PostingService};

/// Outcome of the lenient credit-note posting. `skipped` carries the
/// "accounting not posted" signals for operator visibility.
#[derive(Debug, Default)]
pub struct CreditNotePosting {
    pub entry: Option<JournalEntry>,
    pub cost_reversal: Option<JournalEntry>,
    pub skipped: Vec<String>,
}

impl<S, C, D> PostingService<S, C, D>
where
    S: LedgerStore,
    C: ChartOfAccounts,
    D: DocumentStore,
{
    /// Post the revenue reversal for a credit note: sales revenue and VAT
    /// debited back, accounts receivable credited for the total with the
    /// customer as third party. Exact mirror of the invoice posting.
    ///
    /// Only invoices already transmitted electronically (sent or accepted)
    /// may receive a credit note.
    pub fn post_credit_note(
        &self,
        credit_note_id: CreditNoteId,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> LedgerResult<JournalEntry> {
        let note = self
            .docs()
            .credit_note(tenant_id, credit_note_id)
            .ok_or_else(|| LedgerError::not_found("credit note"))?;
        let invoice = self
            .docs()
            .invoice(tenant_id, note.invoice_id)
            .ok_or_else(|| LedgerError::not_found("invoice"))?;

        if !invoice.electronic_status.accepts_credit_note() {
            return Err(LedgerError::InvoiceNotSent);
        }

        let customer = self
            .docs()
            .customer(tenant_id, invoice.customer_id)
            .ok_or_else(|| LedgerError::not_found("customer"))?;

        let mut wanted = vec![AccountRole::SalesRevenue, AccountRole::AccountsReceivable];
        if !note.tax.is_zero() {
            wanted.push(AccountRole::VatGenerated);
        }
        let config = self.config_with(tenant_id, &wanted)?;

        let intent = PostingIntent {
            date: note.date,
            kind: EntryKind::Income,
            description: format!("Credit note {credit_note_id}, invoice {}", note.invoice_id),
            reference: Some(note.invoice_id.to_string()),
            source: SourceRef::new(SourceKind::CreditNote, credit_note_id),
            lines: vec![
                IntentLine::debit(AccountRole::SalesRevenue, note.subtotal),
                IntentLine::debit(AccountRole::VatGenerated, note.tax),
                IntentLine::credit(AccountRole::AccountsReceivable, note.total)
                    .with_third_party(ThirdParty::customer(&customer)),
            ],
        };

        let entry = self.post_intent(tenant_id, user_id, &config, intent)?;
        tracing::info!(
            "posted credit note {} as entry {}",
            credit_note_id,
            entry.number
        );
        Ok(entry)
    }

    /// Restore inventory cost for returned items: inventory debited, cost of
    /// sales credited for the summed cost of the returned items. `None` when
    /// that cost is zero. Uses its own source kind so it never collides with
    /// the credit-note revenue entry.
    pub fn reverse_cost_for_return(
        &self,
        credit_note_id: CreditNoteId,
        warehouse_id: WarehouseId,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> LedgerResult<Option<JournalEntry>> {
        let note = self
            .docs()
            .credit_note(tenant_id, credit_note_id)
            .ok_or_else(|| LedgerError::not_found("credit note"))?;

        let cost = note.returned_cost();
        if cost.is_zero() {
            return Ok(None);
        }

        let config = self.config_with(
            tenant_id,
            &[AccountRole::Inventory, AccountRole::CostOfSales],
        )?;

        let intent = PostingIntent {
            date: note.date,
            kind: EntryKind::CostSales,
            description: format!(
                "Cost reversal, credit note {credit_note_id}, warehouse {warehouse_id}"
            ),
            reference: Some(credit_note_id.to_string()),
            source: SourceRef::new(SourceKind::CreditNoteCostReversal, credit_note_id),
            lines: vec![
                IntentLine::debit(AccountRole::Inventory, cost),
                IntentLine::credit(AccountRole::CostOfSales, cost),
            ],
        };

        let entry = self.post_intent(tenant_id, user_id, &config, intent)?;
        tracing::info!(
            "reversed cost for credit note {} as entry {}",
            credit_note_id,
            entry.number
        );
        Ok(Some(entry))
    }

    /// Best-effort posting of both credit-note entries.
    ///
    /// Configuration gaps do not fail the call: each skipped posting is
    /// logged and reported in [`CreditNotePosting::skipped`] so the caller
    /// can surface "accounting not posted" without aborting the return.
    /// Every other failure (missing documents, state errors) propagates.
    pub fn post_credit_note_with_cost_reversal(
        &self,
        credit_note_id: CreditNoteId,
        warehouse_id: WarehouseId,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> LedgerResult<CreditNotePosting> {
        let mut outcome = CreditNotePosting::default();

        match self.post_credit_note(credit_note_id, tenant_id, user_id) {
            Ok(entry) => outcome.entry = Some(entry),
            Err(err @ LedgerError::MissingConfiguration { .. }) => {
                tracing::warn!(
                    "credit note {} not posted to accounting: {}",
                    credit_note_id,
                    err
                );
                outcome.skipped.push(err.to_string());
            }
            Err(other) => return Err(other),
        }

        match self.reverse_cost_for_return(credit_note_id, warehouse_id, tenant_id, user_id) {
            Ok(entry) => outcome.cost_reversal = entry,
            Err(err @ LedgerError::MissingConfiguration { .. }) => {
                tracing::warn!(
                    "cost reversal for credit note {} not posted to accounting: {}",
                    credit_note_id,
                    err
                );
                outcome.skipped.push(err.to_string());
            }
            Err(other) => return Err(other),
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use partida_core::{CreditNoteId, CustomerId, InvoiceId, UserId, WarehouseId};
    use partida_documents::{CreditNote, CreditNoteItem, CreditNoteKind, ElectronicStatus};

    use crate::error::LedgerError;
    use crate::posting::testutil::{fixture, test_date, Fixture};

    fn seed_credit_note(
        fx: &Fixture,
        invoice_id: InvoiceId,
        subtotal: Decimal,
        tax: Decimal,
        items: Vec<CreditNoteItem>,
    ) -> CreditNoteId {
        let id = CreditNoteId::new();
        fx.docs.put_credit_note(CreditNote {
            id,
            tenant_id: fx.tenant,
            invoice_id,
            kind: CreditNoteKind::Total,
            date: test_date(),
            subtotal,
            tax,
            total: subtotal + tax,
            items,
        });
        id
    }

    fn seed_sale(fx: &Fixture) -> (CustomerId, InvoiceId) {
        let customer = fx.seed_customer("Constructora ABC");
        let invoice = fx.seed_invoice(customer, dec!(100), dec!(19));
        (customer, invoice)
    }

    #[test]
    fn total_credit_note_mirrors_the_invoice_entry() {
        let fx = fixture();
        let (_, invoice) = seed_sale(&fx);
        let user = UserId::new();

        fx.posting.post_invoice(invoice, fx.tenant, user).unwrap();
        let note = seed_credit_note(&fx, invoice, dec!(100), dec!(19), vec![]);
        let entry = fx.posting.post_credit_note(note, fx.tenant, user).unwrap();

        assert_eq!(entry.lines.len(), 3);
        assert_eq!(entry.lines[0].account_id, fx.accounts.sales_revenue);
        assert_eq!(entry.lines[0].debit, dec!(100));
        assert_eq!(entry.lines[1].account_id, fx.accounts.vat_generated);
        assert_eq!(entry.lines[1].debit, dec!(19));
        assert_eq!(entry.lines[2].account_id, fx.accounts.accounts_receivable);
        assert_eq!(entry.lines[2].credit, dec!(119));
        assert!(entry.lines[2].third_party.is_some());
        assert_eq!(entry.total_debit, dec!(119));
        assert_eq!(entry.total_credit, dec!(119));
    }

    #[test]
    fn credit_note_requires_transmitted_invoice() {
        let fx = fixture();
        let customer = fx.seed_customer("Constructora ABC");
        let invoice = InvoiceId::new();
        fx.docs.put_invoice(partida_documents::Invoice {
            id: invoice,
            tenant_id: fx.tenant,
            customer_id: customer,
            date: test_date(),
            subtotal: dec!(100),
            tax: dec!(19),
            total: dec!(119),
            electronic_status: ElectronicStatus::Pending,
            items: vec![],
        });
        let note = seed_credit_note(&fx, invoice, dec!(100), dec!(19), vec![]);

        let err = fx
            .posting
            .post_credit_note(note, fx.tenant, UserId::new())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvoiceNotSent));
    }

    #[test]
    fn cost_reversal_restores_inventory() {
        let fx = fixture();
        let (_, invoice) = seed_sale(&fx);
        let items = vec![CreditNoteItem {
            product_id: partida_core::ProductId::new(),
            quantity: dec!(2),
            unit_cost: dec!(30),
        }];
        let note = seed_credit_note(&fx, invoice, dec!(100), dec!(19), items);

        let entry = fx
            .posting
            .reverse_cost_for_return(note, WarehouseId::new(), fx.tenant, UserId::new())
            .unwrap()
            .expect("non-zero returned cost");

        assert_eq!(entry.lines[0].account_id, fx.accounts.inventory);
        assert_eq!(entry.lines[0].debit, dec!(60));
        assert_eq!(entry.lines[1].account_id, fx.accounts.cost_of_sales);
        assert_eq!(entry.lines[1].credit, dec!(60));
    }

    #[test]
    fn cost_reversal_skips_zero_cost_returns() {
        let fx = fixture();
        let (_, invoice) = seed_sale(&fx);
        let note = seed_credit_note(&fx, invoice, dec!(100), dec!(19), vec![]);

        let result = fx
            .posting
            .reverse_cost_for_return(note, WarehouseId::new(), fx.tenant, UserId::new())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn cost_reversal_does_not_collide_with_the_note_entry() {
        let fx = fixture();
        let (_, invoice) = seed_sale(&fx);
        let items = vec![CreditNoteItem {
            product_id: partida_core::ProductId::new(),
            quantity: dec!(1),
            unit_cost: dec!(30),
        }];
        let note = seed_credit_note(&fx, invoice, dec!(100), dec!(19), items);
        let user = UserId::new();

        let entry = fx.posting.post_credit_note(note, fx.tenant, user).unwrap();
        let reversal = fx
            .posting
            .reverse_cost_for_return(note, WarehouseId::new(), fx.tenant, user)
            .unwrap()
            .unwrap();
        assert_ne!(entry.id, reversal.id);
    }

    #[test]
    fn lenient_wrapper_reports_skips_instead_of_failing() {
        let fx = fixture();
        let (_, invoice) = seed_sale(&fx);
        let items = vec![CreditNoteItem {
            product_id: partida_core::ProductId::new(),
            quantity: dec!(1),
            unit_cost: dec!(30),
        }];
        let note = seed_credit_note(&fx, invoice, dec!(100), dec!(19), items);

        // No configuration: both postings are skipped, the call succeeds.
        let outcome = fx
            .unconfigured()
            .post_credit_note_with_cost_reversal(
                note,
                WarehouseId::new(),
                fx.tenant,
                UserId::new(),
            )
            .unwrap();

        assert!(outcome.entry.is_none());
        assert!(outcome.cost_reversal.is_none());
        assert_eq!(outcome.skipped.len(), 2);
    }

    #[test]
    fn lenient_wrapper_posts_both_when_configured() {
        let fx = fixture();
        let (_, invoice) = seed_sale(&fx);
        let items = vec![CreditNoteItem {
            product_id: partida_core::ProductId::new(),
            quantity: dec!(1),
            unit_cost: dec!(30),
        }];
        let note = seed_credit_note(&fx, invoice, dec!(100), dec!(19), items);

        let outcome = fx
            .posting
            .post_credit_note_with_cost_reversal(
                note,
                WarehouseId::new(),
                fx.tenant,
                UserId::new(),
            )
            .unwrap();

        assert!(outcome.entry.is_some());
        assert!(outcome.cost_reversal.is_some());
        assert!(outcome.skipped.is_empty());
    }
}
