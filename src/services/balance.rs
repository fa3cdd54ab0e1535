//! Ledger aggregation: all-time and period-bounded balance summaries.
//! Amounts are exact decimals; sums never go through floating point.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{EntryKind, LedgerEntry};

/// Aggregated totals over a set of ledger entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSummary {
    #[serde(rename = "ingresos")]
    pub total_income: BigDecimal,
    #[serde(rename = "gastos")]
    pub total_expense: BigDecimal,
    #[serde(rename = "balance")]
    pub net: BigDecimal,
}

/// Period-bounded aggregation: the summary plus the records that fell
/// inside the range.
#[derive(Debug, Clone)]
pub struct PeriodBalance {
    pub summary: BalanceSummary,
    pub entries: Vec<LedgerEntry>,
}

/// A period query is missing a bound, or has start > end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rango de fechas ausente o invalido")]
pub struct InvalidRange;

pub fn aggregate(entries: &[LedgerEntry]) -> BalanceSummary {
    let mut total_income = BigDecimal::from(0);
    let mut total_expense = BigDecimal::from(0);

    for entry in entries {
        match entry.kind {
            EntryKind::Income => total_income += &entry.amount,
            EntryKind::Expense => total_expense += &entry.amount,
        }
    }

    let net = &total_income - &total_expense;
    BalanceSummary {
        total_income,
        total_expense,
        net,
    }
}

/// Both bounds are mandatory and inclusive, at day precision against the
/// entry's occurrence date in UTC.
pub fn aggregate_period(
    entries: &[LedgerEntry],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<PeriodBalance, InvalidRange> {
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) if start <= end => (start, end),
        _ => return Err(InvalidRange),
    };

    let selected: Vec<LedgerEntry> = entries
        .iter()
        .filter(|entry| {
            let day = entry.occurred_at.date_naive();
            start <= day && day <= end
        })
        .cloned()
        .collect();

    let summary = aggregate(&selected);
    Ok(PeriodBalance {
        summary,
        entries: selected,
    })
}
