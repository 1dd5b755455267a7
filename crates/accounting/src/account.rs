use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use partida_core::{AccountId, TenantId};

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
    Cost,
}

impl AccountKind {
    /// The side on which balances of this kind normally accumulate.
    pub fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense | Self::Cost => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Income => NormalSide::Credit,
        }
    }
}

/// Normal balance side of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    Debit,
    Credit,
}

/// Chart-of-accounts entry + metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub code: String, // e.g. "1305"
    pub name: String, // e.g. "Clientes"
    pub kind: AccountKind,
    pub normal_side: NormalSide,
    /// Movements must carry a counterparty identity (receivables/payables).
    pub requires_third_party: bool,
    /// Movements must carry a cost center.
    pub requires_cost_center: bool,
}

impl Account {
    /// Account with the defaults derived from its kind.
    pub fn new(id: AccountId, code: impl Into<String>, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            kind,
            normal_side: kind.normal_side(),
            requires_third_party: false,
            requires_cost_center: false,
        }
    }

    pub fn with_third_party(mut self) -> Self {
        self.requires_third_party = true;
        self
    }
}

/// Read-only view of a tenant's chart of accounts.
///
/// The chart is owned by an external collaborator; the ledger engine only
/// resolves accounts by id (configuration roles) or by code prefix (payroll
/// fallback resolution).
pub trait ChartOfAccounts: Send + Sync {
    fn account(&self, tenant_id: TenantId, id: AccountId) -> Option<Account>;

    /// Accounts whose code starts with `prefix`, ordered by code.
    fn find_by_code_prefix(&self, tenant_id: TenantId, prefix: &str) -> Vec<Account>;
}

impl<C> ChartOfAccounts for Arc<C>
where
    C: ChartOfAccounts + ?Sized,
{
    fn account(&self, tenant_id: TenantId, id: AccountId) -> Option<Account> {
        (**self).account(tenant_id, id)
    }

    fn find_by_code_prefix(&self, tenant_id: TenantId, prefix: &str) -> Vec<Account> {
        (**self).find_by_code_prefix(tenant_id, prefix)
    }
}

/// In-memory chart for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryChart {
    accounts: RwLock<HashMap<(TenantId, AccountId), Account>>,
}

impl InMemoryChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, tenant_id: TenantId, account: Account) {
        if let Ok(mut map) = self.accounts.write() {
            map.insert((tenant_id, account.id), account);
        }
    }
}

impl ChartOfAccounts for InMemoryChart {
    fn account(&self, tenant_id: TenantId, id: AccountId) -> Option<Account> {
        self.accounts.read().ok()?.get(&(tenant_id, id)).cloned()
    }

    fn find_by_code_prefix(&self, tenant_id: TenantId, prefix: &str) -> Vec<Account> {
        let map = match self.accounts.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut found: Vec<Account> = map
            .iter()
            .filter(|((t, _), a)| *t == tenant_id && a.code.starts_with(prefix))
            .map(|(_, a)| a.clone())
            .collect();
        found.sort_by(|a, b| a.code.cmp(&b.code));
        found
    }
}
