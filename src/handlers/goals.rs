use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::Goal;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::ports::GoalUpdate;
use crate::services::ownership;
use crate::validation::{
    sanitize_string, validate_non_negative_amount, validate_positive_amount, validate_required,
};
use crate::AppState;

const SAVINGS_OVER_TARGET: &str = "el ahorro no puede exceder el valor objetivo de la meta";

pub async fn list_goals(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let goals = state.goals.find_by_owner(caller).await?;
    Ok(Json(goals))
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalPayload {
    pub titulo: String,
    pub descripcion: String,
    #[serde(rename = "valorObjetivo")]
    pub valor_objetivo: BigDecimal,
}

pub async fn create_goal(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CreateGoalPayload>,
) -> Result<impl IntoResponse, AppError> {
    let titulo = sanitize_string(&payload.titulo);
    let descripcion = sanitize_string(&payload.descripcion);
    validate_required("titulo", &titulo)?;
    validate_required("descripcion", &descripcion)?;
    validate_positive_amount("valorObjetivo", &payload.valor_objetivo)?;

    let goal = Goal::new(titulo, descripcion, payload.valor_objetivo, caller);
    let created = state.goals.insert(&goal).await?;

    tracing::info!(goal_id = %created.id, user_id = %caller, "meta creada");
    Ok(Json(created))
}

pub async fn get_goal(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let goal = state
        .goals
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("meta no encontrada".to_string()))?;

    ownership::ensure_owner(goal.owner.as_ref(), caller, "consultar esta meta")?;
    Ok(Json(goal))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateGoalPayload {
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    #[serde(rename = "valorObjetivo")]
    pub valor_objetivo: Option<BigDecimal>,
    #[serde(rename = "valorAhorroActual")]
    pub valor_ahorro_actual: Option<BigDecimal>,
}

pub async fn update_goal(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGoalPayload>,
) -> Result<impl IntoResponse, AppError> {
    let goal = state
        .goals
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("meta no encontrada".to_string()))?;

    ownership::ensure_owner(goal.owner.as_ref(), caller, "actualizar esta meta")?;

    let mut changes = GoalUpdate::default();
    if let Some(titulo) = payload.titulo {
        let titulo = sanitize_string(&titulo);
        validate_required("titulo", &titulo)?;
        changes.title = Some(titulo);
    }
    if let Some(descripcion) = payload.descripcion {
        let descripcion = sanitize_string(&descripcion);
        validate_required("descripcion", &descripcion)?;
        changes.description = Some(descripcion);
    }
    if let Some(objetivo) = payload.valor_objetivo {
        validate_positive_amount("valorObjetivo", &objetivo)?;
        changes.target_amount = Some(objetivo);
    }
    if let Some(ahorro) = payload.valor_ahorro_actual {
        validate_non_negative_amount("valorAhorroActual", &ahorro)?;
        // Checked against the target this same request sets, if any.
        let target = changes.target_amount.as_ref().unwrap_or(&goal.target_amount);
        if &ahorro > target {
            return Err(AppError::validation(SAVINGS_OVER_TARGET));
        }
        changes.saved_amount = Some(ahorro);
    }

    let updated = state
        .goals
        .update_by_id(id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("meta no encontrada".to_string()))?;

    Ok(Json(updated))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let goal = state
        .goals
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("meta no encontrada".to_string()))?;

    ownership::ensure_owner(goal.owner.as_ref(), caller, "eliminar esta meta")?;

    state
        .goals
        .delete_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("meta no encontrada".to_string()))?;

    tracing::info!(goal_id = %id, user_id = %caller, "meta eliminada");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SavingsPayload {
    #[serde(rename = "valorAhorro")]
    pub valor_ahorro: BigDecimal,
}

pub async fn update_goal_savings(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SavingsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let goal = state
        .goals
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("meta no encontrada".to_string()))?;

    ownership::ensure_owner(goal.owner.as_ref(), caller, "actualizar esta meta")?;

    validate_non_negative_amount("valorAhorro", &payload.valor_ahorro)?;
    if payload.valor_ahorro > goal.target_amount {
        return Err(AppError::validation(SAVINGS_OVER_TARGET));
    }

    let updated = state
        .goals
        .update_by_id(
            id,
            GoalUpdate {
                saved_amount: Some(payload.valor_ahorro),
                ..Default::default()
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("meta no encontrada".to_string()))?;

    tracing::info!(goal_id = %id, user_id = %caller, "ahorro actualizado");
    Ok(Json(updated))
}
