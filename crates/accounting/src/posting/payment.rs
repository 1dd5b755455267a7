//! Payment posting: money received against an invoice.

use partida_core::{PaymentId, TenantId, UserId};
use partida_documents::{DocumentStore, PaymentMethod};

use crate::account::ChartOfAccounts;
use crate::config::AccountRole;
use crate::entry::{EntryKind, JournalEntry, SourceKind, SourceRef, ThirdParty};
use crate::error::{LedgerError, LedgerResult};
use crate::store::LedgerStore;

use super::{IntentLine, PostingIntent, PostingService};

impl<S, C, D> PostingService<S, C, D>
where
    S: LedgerStore,
    C: ChartOfAccounts,
    D: DocumentStore,
{
    /// Post a received payment: cash or bank debited by method, accounts
    /// receivable credited with the customer as third party.
    ///
    /// Cash payments debit the cash account. Card and transfer payments
    /// debit the bank account, falling back to cash when no bank account is
    /// configured.
    pub fn post_payment(
        &self,
        payment_id: PaymentId,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> LedgerResult<JournalEntry> {
        let payment = self
            .docs()
            .payment(tenant_id, payment_id)
            .ok_or_else(|| LedgerError::not_found("payment"))?;
        let customer = self
            .docs()
            .customer(tenant_id, payment.customer_id)
            .ok_or_else(|| LedgerError::not_found("customer"))?;

        // Cash is required even for bank methods: it is the fallback.
        let config = self.config_with(
            tenant_id,
            &[AccountRole::Cash, AccountRole::AccountsReceivable],
        )?;

        let funds_role = match payment.method {
            PaymentMethod::Cash => AccountRole::Cash,
            PaymentMethod::Card | PaymentMethod::Transfer => {
                if config.bank.is_some() {
                    AccountRole::Bank
                } else {
                    AccountRole::Cash
                }
            }
        };

        let intent = PostingIntent {
            date: payment.date,
            kind: EntryKind::Income,
            description: format!("Payment {payment_id} received"),
            reference: Some(payment.invoice_id.to_string()),
            source: SourceRef::new(SourceKind::Payment, payment_id),
            lines: vec![
                IntentLine::debit(funds_role, payment.amount),
                IntentLine::credit(AccountRole::AccountsReceivable, payment.amount)
                    .with_third_party(ThirdParty::customer(&customer)),
            ],
        };

        let entry = self.post_intent(tenant_id, user_id, &config, intent)?;
        tracing::info!("posted payment {} as entry {}", payment_id, entry.number);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use partida_core::{PaymentId, UserId};
    use partida_documents::{Payment, PaymentMethod};

    use crate::config::ConfigPatch;
    use crate::posting::testutil::{fixture, test_date, Fixture};

    fn seed_payment(fx: &Fixture, method: PaymentMethod) -> PaymentId {
        let customer = fx.seed_customer("Constructora ABC");
        let invoice = fx.seed_invoice(customer, dec!(100), dec!(19));
        let id = PaymentId::new();
        fx.docs.put_payment(Payment {
            id,
            tenant_id: fx.tenant,
            invoice_id: invoice,
            customer_id: customer,
            amount: dec!(119),
            method,
            date: test_date(),
        });
        id
    }

    #[test]
    fn cash_payment_debits_cash() {
        let fx = fixture();
        let payment = seed_payment(&fx, PaymentMethod::Cash);

        let entry = fx
            .posting
            .post_payment(payment, fx.tenant, UserId::new())
            .unwrap();

        assert_eq!(entry.lines[0].account_id, fx.accounts.cash);
        assert_eq!(entry.lines[0].debit, dec!(119));
        assert_eq!(entry.lines[1].account_id, fx.accounts.accounts_receivable);
        assert_eq!(entry.lines[1].credit, dec!(119));
        assert!(entry.lines[1].third_party.is_some());
    }

    #[test]
    fn card_payment_debits_bank() {
        let fx = fixture();
        let payment = seed_payment(&fx, PaymentMethod::Card);

        let entry = fx
            .posting
            .post_payment(payment, fx.tenant, UserId::new())
            .unwrap();
        assert_eq!(entry.lines[0].account_id, fx.accounts.bank);
    }

    #[test]
    fn card_payment_falls_back_to_cash_without_bank_role() {
        let fx = fixture();
        let payment = seed_payment(&fx, PaymentMethod::Card);

        // Tenant with cash + receivable mapped but no bank account.
        let posting = fx.unconfigured();
        posting
            .journal()
            .upsert_config(
                fx.tenant,
                &ConfigPatch {
                    cash: Some(fx.accounts.cash),
                    accounts_receivable: Some(fx.accounts.accounts_receivable),
                    ..ConfigPatch::default()
                },
            )
            .unwrap();

        let entry = posting
            .post_payment(payment, fx.tenant, UserId::new())
            .unwrap();
        assert_eq!(entry.lines[0].account_id, fx.accounts.cash);
    }

    #[test]
    fn transfer_posts_once_per_payment() {
        let fx = fixture();
        let payment = seed_payment(&fx, PaymentMethod::Transfer);
        let user = UserId::new();

        let first = fx.posting.post_payment(payment, fx.tenant, user).unwrap();
        let second = fx.posting.post_payment(payment, fx.tenant, user).unwrap();
        assert_eq!(first.id, second.id);
    }
}
