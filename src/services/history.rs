//! History merger: projects stored records into one date-ordered sequence of
//! reporting items.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{EntryKind, LedgerEntry};

/// Origin of a history item. Only ledger entries feed the merger today; a
/// new source maps through the same [`HistoryItem`] contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    #[serde(rename = "Finanza")]
    Ledger,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Ledger => "Finanza",
        }
    }
}

/// Normalized, read-only projection of a record for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryItem {
    pub id: Uuid,
    #[serde(rename = "fecha")]
    pub date: DateTime<Utc>,
    #[serde(rename = "tipo")]
    pub source: SourceKind,
    #[serde(rename = "accion")]
    pub action: EntryKind,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "monto")]
    pub amount: BigDecimal,
}

/// Optional day bounds; each bound is inclusive when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl HistoryFilter {
    fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        if let Some(start) = self.start {
            if day < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if day > end {
                return false;
            }
        }
        true
    }
}

/// Merges ledger entries into one sequence ordered by date, ascending.
/// The sort is stable, so the store order of equal dates is preserved.
pub fn build_history(entries: &[LedgerEntry], filter: &HistoryFilter) -> Vec<HistoryItem> {
    let mut items: Vec<HistoryItem> = entries
        .iter()
        .filter(|entry| filter.contains(entry.occurred_at))
        .map(|entry| HistoryItem {
            id: entry.id,
            date: entry.occurred_at,
            source: SourceKind::Ledger,
            action: entry.kind,
            description: entry.description.clone(),
            amount: entry.amount.clone(),
        })
        .collect();

    items.sort_by_key(|item| item.date);
    items
}
