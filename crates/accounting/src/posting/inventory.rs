//! Inventory purchase posting: goods received into stock.

use chrono::Utc;
use rust_decimal::Decimal;

use partida_core::{PurchaseId, TenantId, UserId};
use partida_documents::{DocumentStore, Supplier};

use crate::account::ChartOfAccounts;
use crate::config::AccountRole;
use crate::entry::{EntryKind, JournalEntry, SourceKind, SourceRef, ThirdParty};
use crate::error::LedgerResult;
use crate::store::LedgerStore;

use super::{IntentLine, PostingIntent, PostingService};

impl<S, C, D> PostingService<S, C, D>
where
    S: LedgerStore,
    C: ChartOfAccounts,
    D: DocumentStore,
{
    /// Post a goods receipt: inventory debited for the received cost,
    /// accounts payable credited with the supplier as third party.
    ///
    /// Purchase receipts live outside the documents the engine reads, so the
    /// caller supplies the total cost and the supplier identity directly.
    pub fn post_inventory_purchase(
        &self,
        purchase_id: PurchaseId,
        tenant_id: TenantId,
        user_id: UserId,
        total_cost: Decimal,
        supplier: Option<&Supplier>,
    ) -> LedgerResult<JournalEntry> {
        let config = self.config_with(
            tenant_id,
            &[AccountRole::Inventory, AccountRole::AccountsPayable],
        )?;

        let mut payable = IntentLine::credit(AccountRole::AccountsPayable, total_cost);
        if let Some(supplier) = supplier {
            payable = payable.with_third_party(ThirdParty::supplier(supplier));
        }

        let intent = PostingIntent {
            date: Utc::now().date_naive(),
            kind: EntryKind::Expense,
            description: format!("Inventory purchase {purchase_id}"),
            reference: Some(purchase_id.to_string()),
            source: SourceRef::new(SourceKind::Purchase, purchase_id),
            lines: vec![
                IntentLine::debit(AccountRole::Inventory, total_cost),
                payable,
            ],
        };

        let entry = self.post_intent(tenant_id, user_id, &config, intent)?;
        tracing::info!(
            "posted inventory purchase {} as entry {}",
            purchase_id,
            entry.number
        );
        Ok(entry)
    }
}
