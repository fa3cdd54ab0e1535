use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::services::history::{self, HistoryFilter};
use crate::services::report::{self, ReportFormat};
use crate::AppState;

use super::parse_date;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "fechaInicio")]
    pub fecha_inicio: Option<String>,
    #[serde(rename = "fechaFin")]
    pub fecha_fin: Option<String>,
}

pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = HistoryFilter {
        start: parse_date(query.fecha_inicio.as_deref())?,
        end: parse_date(query.fecha_fin.as_deref())?,
    };

    let entries = state.entries.find_by_owner(caller).await?;
    Ok(Json(history::build_history(&entries, &filter)))
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub formato: Option<String>,
    #[serde(rename = "fechaInicio")]
    pub fecha_inicio: Option<String>,
    #[serde(rename = "fechaFin")]
    pub fecha_fin: Option<String>,
}

pub async fn download_history(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, AppError> {
    let format = ReportFormat::parse(query.formato.as_deref().unwrap_or_default())?;
    let filter = HistoryFilter {
        start: parse_date(query.fecha_inicio.as_deref())?,
        end: parse_date(query.fecha_fin.as_deref())?,
    };

    let entries = state.entries.find_by_owner(caller).await?;
    let items = history::build_history(&entries, &filter);
    let rendered = report::render(&items, format)?;

    tracing::info!(user_id = %caller, archivo = rendered.filename, "historial descargado");
    Ok((
        [
            (header::CONTENT_TYPE, rendered.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", rendered.filename),
            ),
        ],
        rendered.bytes,
    ))
}
