use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{EntryKind, LedgerEntry};
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::ports::EntryUpdate;
use crate::services::{balance, ownership};
use crate::validation::{sanitize_string, validate_positive_amount, validate_required};
use crate::AppState;

use super::parse_date;

pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let entries = state.entries.find_by_owner(caller).await?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub struct CreateEntryPayload {
    pub valor: BigDecimal,
    pub descripcion: String,
    pub tipo: String,
    pub fecha: Option<DateTime<Utc>>,
}

pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CreateEntryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let kind: EntryKind = payload
        .tipo
        .parse()
        .map_err(|_| AppError::validation("el tipo debe ser Gasto o Ingreso"))?;
    let descripcion = sanitize_string(&payload.descripcion);
    validate_required("descripcion", &descripcion)?;
    validate_positive_amount("valor", &payload.valor)?;

    let entry = LedgerEntry::new(payload.valor, kind, descripcion, payload.fecha, caller);
    let created = state.entries.insert(&entry).await?;

    tracing::info!(entry_id = %created.id, user_id = %caller, "finanza registrada");
    Ok(Json(created))
}

pub async fn get_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state
        .entries
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("finanza no encontrada".to_string()))?;

    ownership::ensure_owner(entry.owner.as_ref(), caller, "consultar esta finanza")?;
    Ok(Json(entry))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateEntryPayload {
    pub valor: Option<BigDecimal>,
    pub descripcion: Option<String>,
    pub tipo: Option<String>,
    pub fecha: Option<DateTime<Utc>>,
}

pub async fn update_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEntryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state
        .entries
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("finanza no encontrada".to_string()))?;

    ownership::ensure_owner(entry.owner.as_ref(), caller, "actualizar esta finanza")?;

    let mut changes = EntryUpdate::default();
    if let Some(raw) = payload.tipo {
        let kind: EntryKind = raw
            .parse()
            .map_err(|_| AppError::validation("el tipo debe ser Gasto o Ingreso"))?;
        changes.kind = Some(kind);
    }
    if let Some(valor) = payload.valor {
        validate_positive_amount("valor", &valor)?;
        changes.amount = Some(valor);
    }
    if let Some(descripcion) = payload.descripcion {
        let descripcion = sanitize_string(&descripcion);
        validate_required("descripcion", &descripcion)?;
        changes.description = Some(descripcion);
    }
    changes.occurred_at = payload.fecha;

    let updated = state
        .entries
        .update_by_id(id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("finanza no encontrada".to_string()))?;

    Ok(Json(updated))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state
        .entries
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("finanza no encontrada".to_string()))?;

    ownership::ensure_owner(entry.owner.as_ref(), caller, "eliminar esta finanza")?;

    state
        .entries
        .delete_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("finanza no encontrada".to_string()))?;

    tracing::info!(entry_id = %id, user_id = %caller, "finanza eliminada");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_balance(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let entries = state.entries.find_by_owner(caller).await?;
    Ok(Json(balance::aggregate(&entries)))
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    #[serde(rename = "fechaInicio")]
    pub fecha_inicio: Option<String>,
    #[serde(rename = "fechaFin")]
    pub fecha_fin: Option<String>,
}

pub async fn get_period_balance(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let start = parse_date(query.fecha_inicio.as_deref())?;
    let end = parse_date(query.fecha_fin.as_deref())?;

    let entries = state.entries.find_by_owner(caller).await?;
    let period = balance::aggregate_period(&entries, start, end)
        .map_err(|_| AppError::validation("valores incorrectos"))?;

    Ok(Json(json!({
        "ingresosPeriodo": period.summary.total_income,
        "gastosPeriodo": period.summary.total_expense,
        "balancePeriodo": period.summary.net,
        "registros": period.entries,
    })))
}
