use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use super::owner::OwnerRef;

/// Movement direction of a ledger entry. The sign of an amount is carried
/// here, never by the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "Ingreso")]
    Income,
    #[serde(rename = "Gasto")]
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "Ingreso",
            EntryKind::Expense => "Gasto",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tipo desconocido: {0}")]
pub struct UnknownEntryKind(pub String);

impl FromStr for EntryKind {
    type Err = UnknownEntryKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Ingreso" => Ok(EntryKind::Income),
            "Gasto" => Ok(EntryKind::Expense),
            other => Err(UnknownEntryKind(other.to_string())),
        }
    }
}

/// One recorded income or expense movement ("finanza").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    #[serde(rename = "valor")]
    pub amount: BigDecimal,
    #[serde(rename = "tipo")]
    pub kind: EntryKind,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fecha")]
    pub occurred_at: DateTime<Utc>,
    #[serde(rename = "user")]
    pub owner: Option<OwnerRef>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// The occurrence date falls back to the creation instant when the
    /// request did not carry one.
    pub fn new(
        amount: BigDecimal,
        kind: EntryKind,
        description: String,
        occurred_at: Option<DateTime<Utc>>,
        owner: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            amount,
            kind,
            description,
            occurred_at: occurred_at.unwrap_or(now),
            owner: Some(OwnerRef::Id(owner)),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn owner_id(&self) -> Option<Uuid> {
        self.owner.as_ref().map(OwnerRef::id)
    }
}
