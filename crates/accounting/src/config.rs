use serde::{Deserialize, Serialize};

use partida_core::{AccountId, TenantId};

use crate::account::{Account, ChartOfAccounts};

/// Semantic accounting role, mapped per tenant to a concrete chart account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Cash,
    Bank,
    AccountsReceivable,
    AccountsPayable,
    Inventory,
    SalesRevenue,
    VatGenerated,
    VatDeductible,
    CostOfSales,
    SalaryExpense,
    PayrollLiabilities,
}

impl AccountRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::AccountsReceivable => "accounts_receivable",
            Self::AccountsPayable => "accounts_payable",
            Self::Inventory => "inventory",
            Self::SalesRevenue => "sales_revenue",
            Self::VatGenerated => "vat_generated",
            Self::VatDeductible => "vat_deductible",
            Self::CostOfSales => "cost_of_sales",
            Self::SalaryExpense => "salary_expense",
            Self::PayrollLiabilities => "payroll_liabilities",
        }
    }
}

impl core::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles every tenant must map before the ledger will post sales documents.
pub const REQUIRED_ROLES: [AccountRole; 6] = [
    AccountRole::Cash,
    AccountRole::AccountsReceivable,
    AccountRole::SalesRevenue,
    AccountRole::VatGenerated,
    AccountRole::CostOfSales,
    AccountRole::Inventory,
];

/// Per-tenant role → account mapping. One logical row per tenant; every
/// column nullable until the tenant finishes accounting onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingConfig {
    pub tenant_id: TenantId,
    pub cash: Option<AccountId>,
    pub bank: Option<AccountId>,
    pub accounts_receivable: Option<AccountId>,
    pub accounts_payable: Option<AccountId>,
    pub inventory: Option<AccountId>,
    pub sales_revenue: Option<AccountId>,
    pub vat_generated: Option<AccountId>,
    pub vat_deductible: Option<AccountId>,
    pub cost_of_sales: Option<AccountId>,
    pub salary_expense: Option<AccountId>,
    pub payroll_liabilities: Option<AccountId>,
}

impl AccountingConfig {
    /// Fresh row with every role unset.
    pub fn empty(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            cash: None,
            bank: None,
            accounts_receivable: None,
            accounts_payable: None,
            inventory: None,
            sales_revenue: None,
            vat_generated: None,
            vat_deductible: None,
            cost_of_sales: None,
            salary_expense: None,
            payroll_liabilities: None,
        }
    }

    pub fn account_for(&self, role: AccountRole) -> Option<AccountId> {
        match role {
            AccountRole::Cash => self.cash,
            AccountRole::Bank => self.bank,
            AccountRole::AccountsReceivable => self.accounts_receivable,
            AccountRole::AccountsPayable => self.accounts_payable,
            AccountRole::Inventory => self.inventory,
            AccountRole::SalesRevenue => self.sales_revenue,
            AccountRole::VatGenerated => self.vat_generated,
            AccountRole::VatDeductible => self.vat_deductible,
            AccountRole::CostOfSales => self.cost_of_sales,
            AccountRole::SalaryExpense => self.salary_expense,
            AccountRole::PayrollLiabilities => self.payroll_liabilities,
        }
    }

    /// Roles from `wanted` that are unset on this row.
    pub fn missing_of(&self, wanted: &[AccountRole]) -> Vec<AccountRole> {
        wanted
            .iter()
            .copied()
            .filter(|r| self.account_for(*r).is_none())
            .collect()
    }

    /// Merge a partial update. Unspecified roles are left untouched.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        macro_rules! merge {
            ($($field:ident),*) => {
                $(if let Some(id) = patch.$field {
                    self.$field = Some(id);
                })*
            };
        }
        merge!(
            cash,
            bank,
            accounts_receivable,
            accounts_payable,
            inventory,
            sales_revenue,
            vat_generated,
            vat_deductible,
            cost_of_sales,
            salary_expense,
            payroll_liabilities
        );
    }

    /// Set roles joined against the chart (for configuration surfaces that
    /// display accounts, not ids). Roles whose account no longer exists in
    /// the chart are skipped.
    pub fn resolve<C: ChartOfAccounts>(&self, chart: &C) -> Vec<(AccountRole, Account)> {
        const ALL: [AccountRole; 11] = [
            AccountRole::Cash,
            AccountRole::Bank,
            AccountRole::AccountsReceivable,
            AccountRole::AccountsPayable,
            AccountRole::Inventory,
            AccountRole::SalesRevenue,
            AccountRole::VatGenerated,
            AccountRole::VatDeductible,
            AccountRole::CostOfSales,
            AccountRole::SalaryExpense,
            AccountRole::PayrollLiabilities,
        ];

        ALL.iter()
            .filter_map(|role| {
                let id = self.account_for(*role)?;
                let account = chart.account(self.tenant_id, id)?;
                Some((*role, account))
            })
            .collect()
    }
}

/// Partial role update. `None` fields are left untouched by `upsert_config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPatch {
    pub cash: Option<AccountId>,
    pub bank: Option<AccountId>,
    pub accounts_receivable: Option<AccountId>,
    pub accounts_payable: Option<AccountId>,
    pub inventory: Option<AccountId>,
    pub sales_revenue: Option<AccountId>,
    pub vat_generated: Option<AccountId>,
    pub vat_deductible: Option<AccountId>,
    pub cost_of_sales: Option<AccountId>,
    pub salary_expense: Option<AccountId>,
    pub payroll_liabilities: Option<AccountId>,
}

/// Outcome of the onboarding completeness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub missing_roles: Vec<AccountRole>,
}

impl ValidationReport {
    /// Check a (possibly absent) config row against the required minimum.
    pub fn for_config(config: Option<&AccountingConfig>) -> Self {
        let missing_roles = match config {
            Some(c) => c.missing_of(&REQUIRED_ROLES),
            None => REQUIRED_ROLES.to_vec(),
        };
        Self {
            is_valid: missing_roles.is_empty(),
            missing_roles,
        }
    }
}
