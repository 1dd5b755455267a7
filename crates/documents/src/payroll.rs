use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use partida_core::{PayrollPeriodId, TenantId};

/// Closed payroll period totals.
///
/// Invariant (established by the payroll module before the period is handed
/// to accounting): `total_earnings == total_deductions + net_pay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    pub id: PayrollPeriodId,
    pub tenant_id: TenantId,
    /// Human label, e.g. "2025-03 quincena 1".
    pub label: String,
    pub date: NaiveDate,
    pub total_earnings: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}
