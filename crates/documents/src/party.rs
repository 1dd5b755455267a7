use serde::{Deserialize, Serialize};

use partida_core::{CustomerId, SupplierId};

/// Customer identity, as attached to receivable lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Tax identifier (e.g. NIT), when registered.
    pub tax_id: Option<String>,
}

/// Supplier identity, as attached to payable lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub tax_id: Option<String>,
}
