use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::owner::OwnerRef;

/// Savings target ("meta") with a running saved amount.
///
/// Invariant: `saved_amount <= target_amount`, checked at every mutation that
/// sets the saved amount. Target edits are never re-checked retroactively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "valorObjetivo")]
    pub target_amount: BigDecimal,
    #[serde(rename = "valorAhorroActual")]
    pub saved_amount: BigDecimal,
    #[serde(rename = "user")]
    pub owner: Option<OwnerRef>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(title: String, description: String, target_amount: BigDecimal, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            target_amount,
            saved_amount: BigDecimal::from(0),
            owner: Some(OwnerRef::Id(owner)),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn owner_id(&self) -> Option<Uuid> {
        self.owner.as_ref().map(OwnerRef::id)
    }
}
