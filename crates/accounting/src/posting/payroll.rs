//! Payroll posting: salary expense against deductions payable and net pay.
//!
//! Accounts resolve through the tenant configuration like every other
//! adapter; a chart code-prefix scan remains as a fallback for tenants whose
//! configuration predates the payroll roles. Entries pass the same
//! draft-then-approve gate as all adapter postings.

use partida_core::{AccountId, PayrollPeriodId, TenantId, UserId};
use partida_documents::DocumentStore;

use crate::account::ChartOfAccounts;
use crate::config::{AccountRole, AccountingConfig};
use crate::entry::{EntryKind, JournalEntry, JournalLine, SourceKind, SourceRef};
use crate::error::{LedgerError, LedgerResult};
use crate::journal::EntryInput;
use crate::store::LedgerStore;

use super::PostingService;

/// Chart code prefixes scanned when the corresponding role is unset.
const SALARY_EXPENSE_PREFIX: &str = "5105";
const PAYROLL_LIABILITY_PREFIX: &str = "2505";
const BANK_PREFIX: &str = "1110";

impl<S, C, D> PostingService<S, C, D>
where
    S: LedgerStore,
    C: ChartOfAccounts,
    D: DocumentStore,
{
    /// Post a closed payroll period: salary expense debited for total
    /// earnings, payroll liabilities credited for total deductions (omitted
    /// when zero), bank credited for net pay.
    pub fn post_payroll(
        &self,
        period_id: PayrollPeriodId,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> LedgerResult<JournalEntry> {
        let period = self
            .docs()
            .payroll_period(tenant_id, period_id)
            .ok_or_else(|| LedgerError::not_found("payroll period"))?;

        let source = SourceRef::new(SourceKind::Payroll, period_id);
        if let Some(existing) = self.journal().entry_for_source(tenant_id, source) {
            return Ok(existing);
        }

        let config = self.journal().config(tenant_id);
        let salary = self.payroll_account(
            tenant_id,
            config.as_ref(),
            AccountRole::SalaryExpense,
            SALARY_EXPENSE_PREFIX,
        )?;
        let liabilities = self.payroll_account(
            tenant_id,
            config.as_ref(),
            AccountRole::PayrollLiabilities,
            PAYROLL_LIABILITY_PREFIX,
        )?;
        let bank = self.payroll_account(
            tenant_id,
            config.as_ref(),
            AccountRole::Bank,
            BANK_PREFIX,
        )?;

        let mut lines = vec![JournalLine::debit(salary, period.total_earnings)];
        if !period.total_deductions.is_zero() {
            lines.push(JournalLine::credit(liabilities, period.total_deductions));
        }
        if !period.net_pay.is_zero() {
            lines.push(JournalLine::credit(bank, period.net_pay));
        }

        let entry = self.post_lines(
            tenant_id,
            user_id,
            EntryInput {
                date: period.date,
                kind: EntryKind::Payroll,
                description: format!("Payroll {}", period.label),
                reference: Some(period.label.clone()),
                source: Some(source),
                lines,
            },
        )?;
        tracing::info!("posted payroll period {} as entry {}", period_id, entry.number);
        Ok(entry)
    }

    /// Role lookup with chart-prefix fallback.
    fn payroll_account(
        &self,
        tenant_id: TenantId,
        config: Option<&AccountingConfig>,
        role: AccountRole,
        prefix: &str,
    ) -> LedgerResult<AccountId> {
        if let Some(id) = config.and_then(|c| c.account_for(role)) {
            return Ok(id);
        }
        self.chart()
            .find_by_code_prefix(tenant_id, prefix)
            .first()
            .map(|a| a.id)
            .ok_or_else(|| LedgerError::MissingAccount {
                description: format!("{role} (code prefix {prefix})"),
            })
    }
}
