pub mod auth;
pub mod entries;
pub mod goals;
pub mod history;

use axum::{response::IntoResponse, Json};
use chrono::NaiveDate;
use serde_json::json;

use crate::error::AppError;

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Parses an optional `YYYY-MM-DD` query value.
pub(crate) fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    raw.map(|value| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| AppError::validation("valores incorrectos"))
    })
    .transpose()
}
